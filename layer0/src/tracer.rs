//! The Tracer — an observer hook for LLM-call, LLM-response, tool-call, and
//! agent-interaction events.
//!
//! The broker and dispatcher are wired against the [`Tracer`] trait and
//! never test for presence — a [`NullTracer`] satisfies the interface and
//! performs no work, eliminating scattered nullability checks in the core.

use crate::id::CorrelationKey;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One of the four tracer event kinds, each carrying a correlation key and
/// a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TracerEvent {
    /// Recorded before a gateway call, with the outgoing messages and
    /// parameters.
    LlmCall {
        /// Correlation key shared with the triggering event/turn.
        correlation_key: CorrelationKey,
        /// Unix millis.
        timestamp_ms: u64,
        /// Model requested.
        model: String,
        /// Serialized outgoing messages.
        messages: serde_json::Value,
        /// Serialized generation parameters.
        params: serde_json::Value,
    },
    /// Recorded after a gateway call, with content, tool-calls, and
    /// measured duration.
    LlmResponse {
        /// Correlation key shared with the triggering `LlmCall`.
        correlation_key: CorrelationKey,
        /// Unix millis.
        timestamp_ms: u64,
        /// Text content, if any.
        content: Option<String>,
        /// Tool calls requested, if any.
        tool_calls: serde_json::Value,
        /// Call duration.
        duration_ms: u64,
    },
    /// Recorded on each tool invocation.
    ToolCall {
        /// Correlation key shared with the triggering turn.
        correlation_key: CorrelationKey,
        /// Unix millis.
        timestamp_ms: u64,
        /// Tool name.
        tool: String,
        /// Arguments passed to the tool.
        arguments: serde_json::Value,
        /// Stringified result, or the error payload on failure.
        result: String,
    },
    /// Recorded for each event delivered by the dispatcher: source, the
    /// handlers it was routed to, the event type, and the correlation key.
    AgentInteraction {
        /// Correlation key of the delivered event.
        correlation_key: CorrelationKey,
        /// Unix millis.
        timestamp_ms: u64,
        /// The producing handler's label.
        from: String,
        /// Labels of the handlers the event was routed to.
        to: Vec<String>,
        /// The event's routing type.
        event_type: String,
    },
}

impl TracerEvent {
    /// The correlation key common to every variant.
    pub fn correlation_key(&self) -> &CorrelationKey {
        match self {
            TracerEvent::LlmCall { correlation_key, .. }
            | TracerEvent::LlmResponse { correlation_key, .. }
            | TracerEvent::ToolCall { correlation_key, .. }
            | TracerEvent::AgentInteraction { correlation_key, .. } => correlation_key,
        }
    }

    /// The timestamp common to every variant, in Unix millis.
    pub fn timestamp_ms(&self) -> u64 {
        match self {
            TracerEvent::LlmCall { timestamp_ms, .. }
            | TracerEvent::LlmResponse { timestamp_ms, .. }
            | TracerEvent::ToolCall { timestamp_ms, .. }
            | TracerEvent::AgentInteraction { timestamp_ms, .. } => *timestamp_ms,
        }
    }

    /// The variant's kind as a short string, for filtering.
    pub fn kind(&self) -> &'static str {
        match self {
            TracerEvent::LlmCall { .. } => "llm_call",
            TracerEvent::LlmResponse { .. } => "llm_response",
            TracerEvent::ToolCall { .. } => "tool_call",
            TracerEvent::AgentInteraction { .. } => "agent_interaction",
        }
    }
}

/// Current time in Unix millis. Centralized so every tracer event uses the
/// same clock source.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Observer interface for LLM-call, LLM-response, tool-call, and
/// agent-interaction events.
#[async_trait]
pub trait Tracer: Send + Sync {
    /// Record a tracer event. Implementations must not propagate errors —
    /// a tracer is an observer, not a control path; a failing tracer
    /// (e.g. a full channel) should drop the event rather than fault the
    /// caller.
    async fn record(&self, event: TracerEvent);
}

/// A stateless [`Tracer`] that performs no work.
///
/// Constructed once at wiring time and injected explicitly — there is no
/// global mutable singleton, per the core's redesign of the "global null
/// tracer" pattern.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTracer;

#[async_trait]
impl Tracer for NullTracer {
    async fn record(&self, _event: TracerEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_tracer_accepts_any_event() {
        let tracer = NullTracer;
        tracer
            .record(TracerEvent::ToolCall {
                correlation_key: CorrelationKey::generate(),
                timestamp_ms: now_ms(),
                tool: "t".into(),
                arguments: serde_json::json!({}),
                result: "ok".into(),
            })
            .await;
    }

    #[test]
    fn kind_strings_are_stable() {
        let key = CorrelationKey::generate();
        let e = TracerEvent::AgentInteraction {
            correlation_key: key,
            timestamp_ms: 0,
            from: "a".into(),
            to: vec!["b".into()],
            event_type: "Content".into(),
        };
        assert_eq!(e.kind(), "agent_interaction");
    }
}
