#![deny(missing_docs)]
//! # neuron-broker — the LLM broker and chat session
//!
//! Two pieces sit on top of `neuron-gateway` and `neuron-tool`:
//!
//! - [`Broker`] drives one completion to a terminal response, resolving
//!   tool-calls recursively until the model returns plain text or a
//!   structured object (or the loop depth is exceeded).
//! - [`ChatSession`] wraps a broker with a token-budgeted conversation
//!   buffer: the system prompt is pinned at index 0, later messages are
//!   evicted FIFO once the budget is exceeded.
//!
//! Neither type depends on a concrete provider — both hold `Arc<dyn
//! Gateway>` and work against any adapter implementing
//! `neuron_gateway::Gateway`.

mod broker;
mod chat_session;
mod error;

pub use broker::{Broker, BrokerConfig, GenerateOutput, LOOP_EXCEEDED_MESSAGE};
pub use chat_session::{ChatSession, ChatSessionConfig, Tokenizer, WhitespaceTokenizer};
pub use error::BrokerError;
