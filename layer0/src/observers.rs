//! Concrete [`Tracer`] implementations beyond the null one.

use crate::tracer::{Tracer, TracerEvent};
use async_trait::async_trait;
use std::sync::Mutex;

/// A [`Tracer`] that emits structured `tracing` events instead of storing
/// anything.
///
/// Mirrors the teacher's `TracingHook`: observes but never controls, and
/// is safe to wire into any `tracing`-compatible subscriber (stdout,
/// `tracing-opentelemetry`, etc).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTracer;

#[async_trait]
impl Tracer for TracingTracer {
    async fn record(&self, event: TracerEvent) {
        match &event {
            TracerEvent::LlmCall {
                correlation_key,
                model,
                ..
            } => {
                tracing::debug!(%correlation_key, model, "neuron.llm.call");
            }
            TracerEvent::LlmResponse {
                correlation_key,
                duration_ms,
                ..
            } => {
                tracing::debug!(%correlation_key, duration_ms, "neuron.llm.response");
            }
            TracerEvent::ToolCall {
                correlation_key,
                tool,
                ..
            } => {
                tracing::debug!(%correlation_key, tool, "neuron.tool.call");
            }
            TracerEvent::AgentInteraction {
                correlation_key,
                from,
                to,
                event_type,
                ..
            } => {
                tracing::debug!(%correlation_key, from, ?to, event_type, "neuron.dispatch.deliver");
            }
        }
    }
}

/// A [`Tracer`] that stores every event in process memory and exposes the
/// query surface spec'd for tracers: filter by type, by time window, by
/// custom predicate, and fetch the last N of a kind.
///
/// Intended for tests and for embedding without a `tracing` subscriber —
/// it is not a production audit/tracing storage backend (those are
/// explicitly out of scope for the core).
#[derive(Default)]
pub struct InMemoryTracer {
    events: Mutex<Vec<TracerEvent>>,
}

impl InMemoryTracer {
    /// Create an empty in-memory tracer.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events of the given kind (`"llm_call"`, `"llm_response"`,
    /// `"tool_call"`, `"agent_interaction"`), in recording order.
    pub fn by_type(&self, kind: &str) -> Vec<TracerEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    /// All events with `timestamp_ms` in `[start, end]`, inclusive.
    pub fn in_window(&self, start: u64, end: u64) -> Vec<TracerEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| {
                let ts = e.timestamp_ms();
                ts >= start && ts <= end
            })
            .cloned()
            .collect()
    }

    /// All events matching an arbitrary predicate.
    pub fn matching(&self, predicate: impl Fn(&TracerEvent) -> bool) -> Vec<TracerEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }

    /// The last `n` events of the given kind, most recent last.
    pub fn last_n(&self, kind: &str, n: usize) -> Vec<TracerEvent> {
        let matches = self.by_type(kind);
        let start = matches.len().saturating_sub(n);
        matches[start..].to_vec()
    }

    /// Total number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Whether no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Tracer for InMemoryTracer {
    async fn record(&self, event: TracerEvent) {
        self.events.lock().unwrap().push(event);
    }
}
