//! The cooperative Event Dispatcher — a single worker drains a FIFO queue
//! on its own stack.

use crate::error::DispatchError;
use crate::event::{Event, TERMINATE_EVENT_TYPE};
use crate::id::CorrelationKey;
use crate::router::Router;
use crate::tracer::{now_ms, Tracer, TracerEvent};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Wiring-time configuration for [`CooperativeDispatcher`].
///
/// `batch_size` and `yield_interval` exist purely for pacing — per
/// spec, the inter-batch yield has no semantic effect on correctness or
/// ordering, only on how often the worker cedes the thread.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Number of queued events drained per batch before yielding.
    pub batch_size: usize,
    /// How long to yield between batches. Zero means "poll again
    /// immediately" — still cooperative, since `run` is driven by an
    /// explicit caller loop or a dedicated blocking task, not free-running
    /// CPU spin.
    pub yield_interval: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            yield_interval: Duration::ZERO,
        }
    }
}

/// Drains a FIFO event queue on a single worker, delivering each event to
/// every handler registered for its type, in registration order, until
/// quiescent or terminated.
///
/// Handler faults are absorbed: a handler that panics-as-error is caught,
/// logged, and processing moves to the next handler is skipped (the
/// remaining handlers for that event do not run), but the dispatcher keeps
/// draining subsequent events.
pub struct CooperativeDispatcher {
    router: Router,
    queue: Mutex<VecDeque<Event>>,
    stop: AtomicBool,
    config: DispatcherConfig,
    tracer: Arc<dyn Tracer>,
}

impl CooperativeDispatcher {
    /// Build a dispatcher around a fully-wired router.
    pub fn new(router: Router, tracer: Arc<dyn Tracer>, config: DispatcherConfig) -> Self {
        Self {
            router,
            queue: Mutex::new(VecDeque::new()),
            stop: AtomicBool::new(false),
            config,
            tracer,
        }
    }

    /// Append `event` to the queue, assigning a fresh correlation key if
    /// none is present. Thread-safe for concurrent submitters.
    pub fn submit(&self, mut event: Event) {
        if event.correlation_key.is_none() {
            event.correlation_key = Some(CorrelationKey::generate());
        }
        self.queue.lock().unwrap().push_back(event);
    }

    /// Request shutdown. The worker drains nothing further once this is
    /// observed at the next batch boundary; in-flight handlers run to
    /// completion.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Whether `stop()` has been called or a `TerminateEvent` has been
    /// processed.
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Drain the queue until quiescent (empty) or stopped. Intended to be
    /// driven by a dedicated worker loop; synchronous end to end so the
    /// broker's internal tool-loop can run inline on this same stack.
    pub async fn run_until_quiescent(&self) {
        loop {
            if self.is_stopped() {
                return;
            }
            let batch = self.drain_batch();
            if batch.is_empty() {
                return;
            }
            for event in batch {
                self.deliver(event).await;
                if self.is_stopped() {
                    return;
                }
            }
            if !self.config.yield_interval.is_zero() {
                tokio::time::sleep(self.config.yield_interval).await;
            } else {
                tokio::task::yield_now().await;
            }
        }
    }

    fn drain_batch(&self) -> Vec<Event> {
        let mut queue = self.queue.lock().unwrap();
        let n = self.config.batch_size.min(queue.len());
        queue.drain(..n).collect()
    }

    async fn deliver(&self, event: Event) {
        let handlers = self.router.resolve(&event);
        self.tracer
            .record(TracerEvent::AgentInteraction {
                correlation_key: event.correlation_key().clone(),
                timestamp_ms: now_ms(),
                from: event.source.to_string(),
                to: handlers.iter().map(|h| h.name().to_string()).collect(),
                event_type: event.event_type.clone(),
            })
            .await;

        for handler in &handlers {
            let outcome =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler.handle(&event)));
            let produced = match outcome {
                Ok(produced) => produced,
                Err(payload) => {
                    let fault = DispatchError::HandlerFault {
                        handler: handler.name().to_string(),
                        event_type: event.event_type.clone(),
                        message: panic_message(&payload),
                    };
                    tracing::error!(%fault, "handler faulted; skipping remaining handlers for this event");
                    break;
                }
            };
            for mut follow_up in produced {
                if follow_up.correlation_key.is_none() {
                    follow_up.correlation_key = Some(event.correlation_key().clone());
                }
                if follow_up.event_type == TERMINATE_EVENT_TYPE {
                    self.stop.store(true, Ordering::SeqCst);
                }
                self.submit(follow_up);
            }
        }
    }

    /// Number of events currently queued.
    pub fn queue_len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }
}

/// Extract a human-readable message from a caught panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked with a non-string payload".to_string()
    }
}
