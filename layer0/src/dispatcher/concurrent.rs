//! The concurrent Event Dispatcher — same contract as the cooperative
//! variant, but handlers and gateway calls may be asynchronous and the
//! queue is safe for multi-producer, single-consumer access.

use crate::event::{Event, TERMINATE_EVENT_TYPE};
use crate::id::CorrelationKey;
use crate::router::Router;
use crate::tracer::{now_ms, Tracer, TracerEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio::time::timeout;

pub use super::cooperative::DispatcherConfig;

/// Drains an MPSC event queue on a dedicated worker task, awaiting each
/// handler's asynchronous entry point. Handler executions for a single
/// event are still serialized in registration order; events themselves
/// are not processed in parallel by default. Submissions are permitted
/// from both the worker task (follow-up events) and external callers.
pub struct ConcurrentDispatcher {
    router: Router,
    sender: mpsc::UnboundedSender<Event>,
    receiver: tokio::sync::Mutex<mpsc::UnboundedReceiver<Event>>,
    stop: AtomicBool,
    config: DispatcherConfig,
    tracer: Arc<dyn Tracer>,
    idle: Notify,
    in_flight: std::sync::atomic::AtomicUsize,
}

impl ConcurrentDispatcher {
    /// Build a dispatcher around a fully-wired router.
    pub fn new(router: Router, tracer: Arc<dyn Tracer>, config: DispatcherConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            router,
            sender,
            receiver: tokio::sync::Mutex::new(receiver),
            stop: AtomicBool::new(false),
            config,
            tracer,
            idle: Notify::new(),
            in_flight: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Append `event` to the queue, assigning a fresh correlation key if
    /// none is present. Safe to call from any task, including the
    /// dispatcher's own worker.
    pub fn submit(&self, mut event: Event) {
        if event.correlation_key.is_none() {
            event.correlation_key = Some(CorrelationKey::generate());
        }
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        // An unbounded channel only fails to send if every receiver has
        // been dropped, i.e. the dispatcher itself is gone.
        let _ = self.sender.send(event);
    }

    /// Request shutdown; the worker stops pulling new events at the next
    /// opportunity.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Whether `stop()` has been called or a `TerminateEvent` has been
    /// processed.
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Run the worker loop until `stop()` is called. Intended to be
    /// spawned as a background task (`tokio::spawn`) by the embedder.
    pub async fn run(self: &Arc<Self>) {
        loop {
            if self.is_stopped() {
                return;
            }
            let event = {
                let mut receiver = self.receiver.lock().await;
                receiver.recv().await
            };
            let Some(event) = event else {
                return;
            };
            self.deliver(event).await;
            let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            if remaining == 0 {
                self.idle.notify_waiters();
            }
            if !self.config.yield_interval.is_zero() {
                tokio::time::sleep(self.config.yield_interval).await;
            }
        }
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
            let produced = handler.handle_async(&event).await;
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

    /// Block until no events are in flight (queued or being delivered), or
    /// `timeout` elapses first. Returns whether the queue reached empty.
    /// Intended for test harnesses driving the worker from a separate
    /// task.
    pub async fn wait_for_empty(&self, deadline: Duration) -> bool {
        if self.in_flight.load(Ordering::SeqCst) == 0 {
            return true;
        }
        let notified = self.idle.notified();
        matches!(timeout(deadline, notified).await, Ok(())) || self.in_flight.load(Ordering::SeqCst) == 0
    }
}
