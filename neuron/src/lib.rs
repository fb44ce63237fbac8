#![deny(missing_docs)]
//! # neuron — the agent-orchestration core, in one crate
//!
//! `neuron` is a single import surface over the four tightly-coupled
//! subsystems that make up the core:
//!
//! - [`layer0`] — the [`Event`](layer0::Event) model, [`Router`](layer0::Router),
//!   the cooperative and concurrent [dispatchers](layer0::dispatcher), the
//!   [`Aggregator`](layer0::Aggregator), and the [`Tracer`](layer0::Tracer)
//!   observer hook.
//! - [`neuron_gateway`] — the provider-agnostic [`Gateway`](neuron_gateway::Gateway)
//!   trait, wire-independent message types, and the capability-bucket
//!   adapter layer.
//! - [`neuron_tool`] — the [`ToolDyn`](neuron_tool::ToolDyn) trait and
//!   [`ToolRegistry`](neuron_tool::ToolRegistry).
//! - [`neuron_broker`] — the [`Broker`](neuron_broker::Broker)'s recursive
//!   tool-call loop and the token-budgeted [`ChatSession`](neuron_broker::ChatSession).
//!
//! The `ollama` feature additionally re-exports [`neuron_provider_ollama`],
//! the one concrete [`Gateway`](neuron_gateway::Gateway) adapter shipped in
//! this workspace, proving the boundary works end to end against a real
//! provider.

pub use layer0;
pub use neuron_broker;
pub use neuron_gateway;
pub use neuron_tool;

#[cfg(feature = "ollama")]
pub use neuron_provider_ollama;

/// Happy-path imports for wiring an agent: event dispatch on one side,
/// the broker/tool-call loop and chat session on the other.
pub mod prelude {
    pub use layer0::{
        AgentId, Aggregator, ConcurrentDispatcher, CooperativeDispatcher, CorrelationKey,
        DispatcherConfig, Event, Handler, InMemoryTracer, NullTracer, Router, Tracer,
        TracerEvent, TERMINATE_EVENT_TYPE,
    };

    pub use neuron_gateway::{
        CapabilityAdapter, CapabilityRegistry, Gateway, GatewayError, GatewayRequest,
        GatewayResponse, GenerationParams, Message, ModelCapabilities, Role, ToolCall,
    };

    pub use neuron_tool::{ToolDyn, ToolError, ToolRegistry};

    pub use neuron_broker::{
        Broker, BrokerConfig, BrokerError, ChatSession, ChatSessionConfig, GenerateOutput,
        Tokenizer, WhitespaceTokenizer,
    };

    #[cfg(feature = "ollama")]
    pub use neuron_provider_ollama::OllamaProvider;
}
