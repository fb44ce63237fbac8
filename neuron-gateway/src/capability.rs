//! The capability-bucket adapter layer (§4.5): classify models into
//! capability buckets at registry time, then rewrite or drop request
//! parameters a bucket doesn't support before handing the request to a
//! [`crate::Gateway`].
//!
//! Concrete rewriting rules are an adapter concern, not a core one — this
//! module specifies the *shape* (a registry + a rewrite pass that logs a
//! warning per rewrite) so provider crates like `neuron-provider-ollama`
//! can implement against it.

use crate::types::GatewayRequest;
use std::collections::HashMap;

/// A bucket of models sharing the same parameter conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelCapabilities {
    /// Accepts temperature, tools, and a reasoning-effort tag.
    Full,
    /// Accepts temperature and tools but no reasoning-effort tag.
    Chat,
    /// Only a single fixed temperature is accepted (rewritten to `None`,
    /// meaning "use provider default").
    FixedTemperature,
    /// Does not support function-calling; tools are dropped entirely.
    ToolsUnsupported,
}

/// Maps model names to their capability bucket, populated at wiring time.
/// Unknown models default to [`ModelCapabilities::Full`] — capability
/// restriction is opt-in per model, not the default posture.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    buckets: HashMap<String, ModelCapabilities>,
}

impl CapabilityRegistry {
    /// Create an empty registry (every model defaults to `Full`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `model` into `bucket`.
    pub fn classify(&mut self, model: impl Into<String>, bucket: ModelCapabilities) {
        self.buckets.insert(model.into(), bucket);
    }

    /// The bucket for `model`, defaulting to `Full` if unclassified.
    pub fn bucket_for(&self, model: &str) -> ModelCapabilities {
        self.buckets.get(model).copied().unwrap_or(ModelCapabilities::Full)
    }
}

/// Rewrites or drops request parameters a model's bucket does not support,
/// logging a warning per rewrite (spec'd `ParameterIncompatibility`: the
/// call proceeds, it is not an error).
pub struct CapabilityAdapter<'a> {
    registry: &'a CapabilityRegistry,
}

impl<'a> CapabilityAdapter<'a> {
    /// Build an adapter over a registry.
    pub fn new(registry: &'a CapabilityRegistry) -> Self {
        Self { registry }
    }

    /// Rewrite `request` in place to match its model's capability bucket.
    pub fn adapt(&self, request: &mut GatewayRequest) {
        let bucket = self.registry.bucket_for(&request.model);
        match bucket {
            ModelCapabilities::Full => {}
            ModelCapabilities::Chat => {
                if request.params.reasoning_effort.take().is_some() {
                    tracing::warn!(
                        model = %request.model,
                        "dropping reasoning_effort: model bucket does not support it"
                    );
                }
            }
            ModelCapabilities::FixedTemperature => {
                if request.params.temperature.take().is_some() {
                    tracing::warn!(
                        model = %request.model,
                        "dropping temperature: model only supports a fixed value"
                    );
                }
                if request.params.reasoning_effort.take().is_some() {
                    tracing::warn!(
                        model = %request.model,
                        "dropping reasoning_effort: model bucket does not support it"
                    );
                }
            }
            ModelCapabilities::ToolsUnsupported => {
                if !request.tools.is_empty() {
                    tracing::warn!(
                        model = %request.model,
                        dropped = request.tools.len(),
                        "dropping tools: model bucket does not support function-calling"
                    );
                    request.tools.clear();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GenerationParams, Message, Role};

    fn req(model: &str) -> GatewayRequest {
        GatewayRequest {
            model: model.into(),
            messages: vec![Message::user("hi")],
            schema: None,
            tools: vec![serde_json::json!({"type": "function"})],
            params: GenerationParams {
                temperature: Some(0.7),
                reasoning_effort: Some("high".into()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn unclassified_model_defaults_to_full_no_rewrite() {
        let registry = CapabilityRegistry::new();
        let adapter = CapabilityAdapter::new(&registry);
        let mut request = req("mystery-model");
        adapter.adapt(&mut request);
        assert_eq!(request.params.temperature, Some(0.7));
        assert_eq!(request.tools.len(), 1);
    }

    #[test]
    fn fixed_temperature_bucket_drops_temperature_and_effort() {
        let mut registry = CapabilityRegistry::new();
        registry.classify("o1-mini", ModelCapabilities::FixedTemperature);
        let adapter = CapabilityAdapter::new(&registry);
        let mut request = req("o1-mini");
        adapter.adapt(&mut request);
        assert!(request.params.temperature.is_none());
        assert!(request.params.reasoning_effort.is_none());
    }

    #[test]
    fn tools_unsupported_bucket_clears_tools() {
        let mut registry = CapabilityRegistry::new();
        registry.classify("vision-only", ModelCapabilities::ToolsUnsupported);
        let adapter = CapabilityAdapter::new(&registry);
        let mut request = req("vision-only");
        adapter.adapt(&mut request);
        assert!(request.tools.is_empty());
    }

    #[test]
    fn chat_bucket_keeps_temperature_drops_effort() {
        let mut registry = CapabilityRegistry::new();
        registry.classify("llama3.2:1b", ModelCapabilities::Chat);
        let adapter = CapabilityAdapter::new(&registry);
        let mut request = req("llama3.2:1b");
        adapter.adapt(&mut request);
        assert_eq!(request.params.temperature, Some(0.7));
        assert!(request.params.reasoning_effort.is_none());
    }
}
