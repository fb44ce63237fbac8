//! Errors surfaced by the broker to its caller.
//!
//! Tool-level faults (`ToolNotFound`, `ToolFault`) never reach this type —
//! the broker absorbs them into the message list so the model can
//! self-correct. Only gateway failures and schema-parse failures propagate.

use neuron_gateway::GatewayError;
use thiserror::Error;

/// Errors from a [`crate::Broker::generate`] call.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The underlying gateway call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A structured-output schema was requested but the gateway did not
    /// return a parsed object. The raw text is retained for inspection.
    #[error("schema parse failure; raw text: {raw}")]
    SchemaParseFailure {
        /// The model's raw text output, unparsed.
        raw: String,
    },

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
