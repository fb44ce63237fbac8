//! # layer0 — the dispatch fabric and correlation aggregator core
//!
//! This crate is the concurrent event-dispatch core of the neuron
//! workspace: a typed [`Event`] model, a [`Router`] mapping event type to
//! ordered handlers, two [`Dispatcher`](dispatcher) execution models
//! (cooperative and concurrent), and a [`Aggregator`] that buffers events
//! by correlation key until a declared set has all arrived.
//!
//! ## The pieces
//!
//! | Piece | Type | What it does |
//! |-------|------|-------------|
//! | Event | [`Event`] | Immutable typed record: type tag, source, correlation key, payload |
//! | Router | [`Router`] | event-type → ordered handler list |
//! | Dispatcher | [`dispatcher::CooperativeDispatcher`], [`dispatcher::ConcurrentDispatcher`] | Drains the queue, delivers to handlers |
//! | Aggregator | [`Aggregator`] | Buffers by correlation key until a needed type-set is covered |
//! | Tracer | [`Tracer`] | Observer hook for LLM-call, LLM-response, tool-call, agent-interaction |
//!
//! ## Design Principle
//!
//! Every event observed by a handler has a non-empty correlation key — the
//! dispatcher assigns one before first delivery, never after. Follow-up
//! events inherit it by convention (handler code copies it), which is how
//! the [`Aggregator`] correlates causally related arrivals.
//!
//! ## Dependency Notes
//!
//! This crate depends on `serde_json::Value` for event payloads and tracer
//! argument/result fields. This is an intentional choice: JSON is the
//! universal interchange format for agentic systems, and
//! `serde_json::Value` is the de facto standard in the Rust ecosystem.

#![deny(missing_docs)]

pub mod aggregator;
pub mod dispatcher;
pub mod duration;
pub mod error;
pub mod event;
pub mod id;
pub mod observers;
pub mod router;
pub mod tracer;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use aggregator::Aggregator;
pub use dispatcher::{ConcurrentDispatcher, CooperativeDispatcher, DispatcherConfig};
pub use duration::DurationMs;
pub use error::{AggregatorError, DispatchError};
pub use event::{Event, TERMINATE_EVENT_TYPE};
pub use id::{AgentId, CorrelationKey};
pub use observers::{InMemoryTracer, TracingTracer};
pub use router::{Handler, Router};
pub use tracer::{now_ms, NullTracer, Tracer, TracerEvent};
