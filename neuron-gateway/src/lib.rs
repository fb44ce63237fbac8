//! # neuron-gateway — the provider-agnostic LLM completion boundary
//!
//! This crate defines the wire-independent request/response vocabulary
//! ([`types`]) that every concrete provider adapter translates to and from,
//! the dyn-safe [`Gateway`] trait adapters implement, and the
//! [`capability`] layer that rewrites requests to match what a given model
//! actually supports.
//!
//! Key types defined here:
//! - [`Gateway`] — provider-agnostic completion primitive (object-safe)
//! - [`GatewayRequest`] / [`GatewayResponse`] — the core request/response
//!   vocabulary
//! - [`capability::CapabilityAdapter`] — per-model parameter rewriting

#![deny(missing_docs)]

pub mod capability;
pub mod provider;
pub mod types;

pub use capability::{CapabilityAdapter, CapabilityRegistry, ModelCapabilities};
pub use provider::{Gateway, GatewayError};
pub use types::*;
