//! The Correlation Aggregator — buffers events by correlation key until a
//! declared set of event types has all been seen, then emits a derived
//! event.

use crate::error::AggregatorError;
use crate::event::Event;
use crate::id::CorrelationKey;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::timeout;

/// Per-correlation-key record: the events received so far.
#[derive(Default)]
struct Buffer {
    events: Vec<Event>,
}

/// Buffers events by correlation key until the declared "needed set" of
/// event types has all arrived for that key, then synthesizes and emits a
/// derived event via a user-supplied `process` closure.
///
/// Each correlation key is private per-aggregator state, mutated only by
/// `receive`; callers must route all events sharing a key through the same
/// aggregator instance. Safe to call `receive` concurrently from multiple
/// tasks — each key's buffer is protected independently.
pub struct Aggregator<F>
where
    F: Fn(Vec<Event>) -> Result<Vec<Event>, AggregatorError> + Send + Sync,
{
    needed: HashSet<String>,
    buffers: Mutex<HashMap<CorrelationKey, Buffer>>,
    waiters: Mutex<HashMap<CorrelationKey, std::sync::Arc<Notify>>>,
    process: F,
}

impl<F> Aggregator<F>
where
    F: Fn(Vec<Event>) -> Result<Vec<Event>, AggregatorError> + Send + Sync,
{
    /// Construct an aggregator with the given needed event-type set and
    /// completion step. An empty needed set means every arrival
    /// immediately completes.
    pub fn new(needed: impl IntoIterator<Item = impl Into<String>>, process: F) -> Self {
        Self {
            needed: needed.into_iter().map(Into::into).collect(),
            buffers: Mutex::new(HashMap::new()),
            waiters: Mutex::new(HashMap::new()),
            process,
        }
    }

    /// Receive one event. If, after appending it, the buffer for its key
    /// covers the needed set, the buffer is atomically removed and handed
    /// to `process`; its output (possibly empty) is returned. Otherwise
    /// returns an empty vec — this is not an error, just non-completion.
    ///
    /// Duplicate event types before completion are retained, not
    /// deduplicated; completion still triggers on first coverage of the
    /// needed set, not on a fixed count.
    pub fn receive(&self, event: Event) -> Result<Vec<Event>, AggregatorError> {
        let key = event.correlation_key().clone();
        let completed = {
            let mut buffers = self.buffers.lock().unwrap();
            let buffer = buffers.entry(key.clone()).or_default();
            buffer.events.push(event);

            let have: HashSet<&str> = buffer.events.iter().map(|e| e.event_type.as_str()).collect();
            let covers_needed = self.needed.iter().all(|t| have.contains(t.as_str()));

            if covers_needed {
                buffers.remove(&key).map(|b| b.events)
            } else {
                None
            }
        };

        match completed {
            Some(events) => {
                let result = (self.process)(events);
                if let Some(notify) = self.waiters.lock().unwrap().remove(&key) {
                    notify.notify_waiters();
                }
                result
            }
            None => Ok(Vec::new()),
        }
    }

    /// Wait for the buffer at `key` to complete, or return the
    /// best-available partial buffer when `timeout` expires.
    ///
    /// Does not itself run `process` on timeout — the caller sees the raw
    /// events collected so far. A completed key that receives additional
    /// events after reset starts a fresh buffer and a fresh wait.
    pub async fn wait_for_events(&self, key: &CorrelationKey, deadline: Duration) -> Vec<Event> {
        let notify = {
            let mut waiters = self.waiters.lock().unwrap();
            waiters
                .entry(key.clone())
                .or_insert_with(|| std::sync::Arc::new(Notify::new()))
                .clone()
        };

        // The buffer may already have completed (and been removed) between
        // a caller checking and calling this; in that case we still return
        // immediately with whatever is currently buffered (empty if the
        // key already completed and nothing new has arrived).
        let wait = notify.notified();
        let _ = timeout(deadline, wait).await;

        self.buffers
            .lock()
            .unwrap()
            .get(key)
            .map(|b| b.events.clone())
            .unwrap_or_default()
    }

    /// Number of correlation keys with an in-flight (incomplete) buffer.
    pub fn pending_keys(&self) -> usize {
        self.buffers.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::AgentId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn ev(event_type: &str, key: &CorrelationKey) -> Event {
        Event::follow_up(event_type, AgentId::new("h"), key.clone(), serde_json::json!({}))
    }

    #[test]
    fn empty_needed_set_completes_on_first_arrival() {
        let completions = Arc::new(AtomicUsize::new(0));
        let c = completions.clone();
        let agg = Aggregator::new(Vec::<String>::new(), move |_events| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        });

        let key = CorrelationKey::generate();
        let out = agg.receive(ev("Anything", &key)).unwrap();
        assert!(out.is_empty());
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn completes_only_after_needed_set_covered() {
        let agg = Aggregator::new(["X", "Y"], |events| {
            Ok(vec![Event::new(
                "Complete",
                AgentId::new("agg"),
                serde_json::json!({ "count": events.len() }),
            )])
        });

        let key = CorrelationKey::generate();
        assert!(agg.receive(ev("X", &key)).unwrap().is_empty());
        let out = agg.receive(ev("Y", &key)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].event_type, "Complete");
    }

    #[test]
    fn duplicate_type_before_completion_retained() {
        let agg = Aggregator::new(["X", "Y"], |events| {
            Ok(vec![Event::new(
                "Complete",
                AgentId::new("agg"),
                serde_json::json!({ "count": events.len() }),
            )])
        });

        let key = CorrelationKey::generate();
        agg.receive(ev("X", &key)).unwrap();
        agg.receive(ev("X", &key)).unwrap();
        let out = agg.receive(ev("Y", &key)).unwrap();
        assert_eq!(out[0].payload["count"], 3);
    }

    #[test]
    fn reset_after_completion_starts_new_buffer() {
        let agg = Aggregator::new(["X", "Y"], |events| {
            Ok(vec![Event::new(
                "Complete",
                AgentId::new("agg"),
                serde_json::json!({ "count": events.len() }),
            )])
        });

        let key = CorrelationKey::generate();
        agg.receive(ev("X", &key)).unwrap();
        agg.receive(ev("Y", &key)).unwrap();
        assert_eq!(agg.pending_keys(), 0);

        // New arrival under the same (now-reset) key starts a new buffer.
        assert!(agg.receive(ev("X", &key)).unwrap().is_empty());
        assert_eq!(agg.pending_keys(), 1);
    }

    #[test]
    fn arbitrary_arrival_order_same_completion() {
        let agg = Aggregator::new(["X", "Y", "Z"], |events| {
            let mut types: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
            types.sort();
            Ok(vec![Event::new(
                "Complete",
                AgentId::new("agg"),
                serde_json::json!({ "types": types }),
            )])
        });

        let key = CorrelationKey::generate();
        agg.receive(ev("Z", &key)).unwrap();
        agg.receive(ev("X", &key)).unwrap();
        let out = agg.receive(ev("Y", &key)).unwrap();
        assert_eq!(out[0].payload["types"], serde_json::json!(["X", "Y", "Z"]));
    }

    #[tokio::test]
    async fn wait_for_events_returns_partial_on_timeout() {
        let agg = Aggregator::new(["X", "Y"], |events| Ok(vec![Event::new(
            "Complete",
            AgentId::new("agg"),
            serde_json::json!({ "count": events.len() }),
        )]));
        let key = CorrelationKey::generate();
        agg.receive(ev("X", &key)).unwrap();

        let partial = agg.wait_for_events(&key, Duration::from_millis(20)).await;
        assert_eq!(partial.len(), 1);
    }

    #[tokio::test]
    async fn wait_for_events_wakes_on_completion() {
        let agg = Arc::new(Aggregator::new(["X", "Y"], |events| {
            Ok(vec![Event::new(
                "Complete",
                AgentId::new("agg"),
                serde_json::json!({ "count": events.len() }),
            )])
        }));
        let key = CorrelationKey::generate();
        agg.receive(ev("X", &key)).unwrap();

        let agg2 = agg.clone();
        let key2 = key.clone();
        let waiter = tokio::spawn(async move {
            agg2.wait_for_events(&key2, Duration::from_secs(5)).await
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        agg.receive(ev("Y", &key)).unwrap();

        let result = waiter.await.unwrap();
        // The buffer was removed on completion; wait_for_events observes
        // that as "nothing currently buffered" rather than re-running
        // process — callers needing the completion event subscribe via
        // receive's return value on the completing call.
        assert!(result.is_empty());
    }

    #[test]
    fn s4_partial_then_complete_two_keys() {
        let completions = Arc::new(Mutex::new(Vec::new()));
        let c = completions.clone();
        let agg = Aggregator::new(["X", "Y"], move |events| {
            c.lock().unwrap().push(events.len());
            Ok(Vec::new())
        });

        let k1 = CorrelationKey::new("K1");
        let k2 = CorrelationKey::new("K2");

        agg.receive(ev("X", &k1)).unwrap();
        agg.receive(ev("Y", &k2)).unwrap();
        agg.receive(ev("Y", &k1)).unwrap();
        agg.receive(ev("X", &k2)).unwrap();

        assert_eq!(*completions.lock().unwrap(), vec![2, 2]);
    }
}
