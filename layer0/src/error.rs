//! Error taxonomy for the dispatch fabric.
//!
//! Gateway- and broker-level kinds (`GatewayError`, `ToolNotFound`,
//! `ToolFault`, `SchemaParseFailure`, `LoopExceeded`,
//! `ParameterIncompatibility`) live in `neuron-gateway`/`neuron-broker`,
//! next to the types they apply to.

use thiserror::Error;

/// Errors from event dispatch.
///
/// `RoutingMiss` and `HandlerFault` are recovered locally by the dispatcher
/// (logged, processing continues) — they are exposed here so tracers and
/// tests can observe them, not because callers are expected to handle them.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A handler raised while processing an event. The dispatcher logs
    /// this, skips the remaining handlers for that event, and continues
    /// with the next queued event.
    #[error("handler {handler} faulted on event {event_type}: {message}")]
    HandlerFault {
        /// Name of the handler that raised.
        handler: String,
        /// The event type being processed.
        event_type: String,
        /// Error message.
        message: String,
    },

    /// The dispatcher was asked to do something after `stop()` was called.
    #[error("dispatcher is stopped")]
    Stopped,

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from the correlation aggregator.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AggregatorError {
    /// The user-supplied `process` step raised while synthesizing the
    /// completion event.
    #[error("process step failed for key {key}: {message}")]
    ProcessFailed {
        /// The correlation key being completed.
        key: String,
        /// Error message.
        message: String,
    },

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
