//! The Event model — an immutable typed record routed by the dispatcher.

use crate::id::{AgentId, CorrelationKey};
use serde::{Deserialize, Serialize};

/// An immutable event observed by handlers.
///
/// Every event carries a type tag (used for routing), a source label (the
/// producing handler), a correlation key, and a JSON payload whose shape is
/// specific to the event type. The correlation key may be absent at
/// submission time — the dispatcher assigns a fresh one before any handler
/// ever sees the event, so the invariant "every observed event has a
/// non-empty correlation key" always holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Routing tag. The router looks up handlers by exact match on this
    /// field — there is no subtype matching in the core contract.
    pub event_type: String,
    /// Opaque label of the producing handler, or a caller-chosen label for
    /// externally submitted events.
    pub source: AgentId,
    /// Correlation key. `None` only between construction and submission;
    /// the dispatcher fills this in before delivery.
    pub correlation_key: Option<CorrelationKey>,
    /// Type-specific payload.
    pub payload: serde_json::Value,
}

/// The type tag reserved for the terminal event.
///
/// A handler returns an `Event` with this `event_type` to signal the
/// dispatcher to stop after draining current work. It is a convention, not
/// a distinct Rust type, so that the router's exact-match dispatch still
/// sees it as an ordinary routable event (a `Terminate` handler may also be
/// registered to run cleanup).
pub const TERMINATE_EVENT_TYPE: &str = "__terminate__";

impl Event {
    /// Construct an event with no correlation key assigned yet.
    pub fn new(
        event_type: impl Into<String>,
        source: impl Into<AgentId>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            source: source.into(),
            correlation_key: None,
            payload,
        }
    }

    /// Construct an event that inherits the correlation key of its cause.
    ///
    /// This is the convention follow-up events are expected to use:
    /// handlers copy the causing event's key onto anything they emit.
    pub fn follow_up(
        event_type: impl Into<String>,
        source: impl Into<AgentId>,
        correlation_key: CorrelationKey,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            source: source.into(),
            correlation_key: Some(correlation_key),
            payload,
        }
    }

    /// The distinguished terminal event. Dispatchers stop after draining
    /// current work once one of these has been processed.
    pub fn terminate(source: impl Into<AgentId>, correlation_key: CorrelationKey) -> Self {
        Self::follow_up(
            TERMINATE_EVENT_TYPE,
            source,
            correlation_key,
            serde_json::Value::Null,
        )
    }

    /// Whether this event is the distinguished terminal event.
    pub fn is_terminate(&self) -> bool {
        self.event_type == TERMINATE_EVENT_TYPE
    }

    /// The correlation key, assuming the dispatcher invariant has already
    /// been established (every event a handler observes has one).
    ///
    /// # Panics
    ///
    /// Panics if called before the dispatcher has assigned a key. Handlers
    /// never see a pre-assignment `Event`, so this is safe to call from
    /// handler code.
    pub fn correlation_key(&self) -> &CorrelationKey {
        self.correlation_key
            .as_ref()
            .expect("dispatcher invariant: correlation key assigned before delivery")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_has_no_key() {
        let e = Event::new("Content", "submitter", serde_json::json!({"text": "hi"}));
        assert!(e.correlation_key.is_none());
    }

    #[test]
    fn follow_up_inherits_key() {
        let key = CorrelationKey::generate();
        let e = Event::follow_up("Classified", "classifier", key.clone(), serde_json::json!({}));
        assert_eq!(e.correlation_key.as_ref(), Some(&key));
    }

    #[test]
    fn terminate_event_is_recognized() {
        let key = CorrelationKey::generate();
        let e = Event::terminate("handler", key);
        assert!(e.is_terminate());
        assert_eq!(e.event_type, TERMINATE_EVENT_TYPE);
    }
}
