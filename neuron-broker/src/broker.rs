//! The LLM Broker — drives a completion to a terminal response, executing
//! any tool-calls the model requests along the way.

use crate::error::BrokerError;
use layer0::{now_ms, CorrelationKey, Tracer, TracerEvent};
use neuron_gateway::{Gateway, GatewayRequest, GenerationParams, Message, ResponseSchema};
use neuron_tool::ToolRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// The conventional text returned when the tool-call loop exceeds
/// [`BrokerConfig::max_tool_loop_depth`] without the model producing a
/// terminal response. Not an error — `LoopExceeded` is absorbed by the
/// broker, per spec.
pub const LOOP_EXCEEDED_MESSAGE: &str =
    "tool-call loop exceeded its maximum depth without a final response";

/// Wiring-time configuration for [`Broker`].
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Maximum number of tool-call round-trips before the loop gives up
    /// and returns [`LOOP_EXCEEDED_MESSAGE`].
    pub max_tool_loop_depth: u32,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            max_tool_loop_depth: 8,
        }
    }
}

/// Terminal output of a [`Broker::generate`] call: either the model's
/// plain text, or the parsed object when a structured-output schema was
/// requested and parsing succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutput {
    /// Plain text content.
    Text(String),
    /// A parsed structured-output object.
    Object(serde_json::Value),
}

impl GenerateOutput {
    /// The text content, or the object's JSON rendering if this is an
    /// `Object` variant. Convenient for callers that just want a string
    /// (e.g. [`crate::ChatSession::send`]).
    pub fn into_text(self) -> String {
        match self {
            GenerateOutput::Text(text) => text,
            GenerateOutput::Object(value) => value.to_string(),
        }
    }
}

/// Drives a completion to a terminal textual (or structured) response,
/// transparently executing any tool-calls the model requests.
///
/// Holds `Arc<dyn Gateway>` rather than being generic over a provider —
/// the gateway boundary is deliberately dyn-safe (see
/// `neuron_gateway::Gateway`'s docs) so a [`crate::ChatSession`] can swap
/// providers at wiring time without becoming generic itself.
pub struct Broker {
    gateway: Arc<dyn Gateway>,
    tracer: Arc<dyn Tracer>,
    config: BrokerConfig,
}

impl Broker {
    /// Construct a broker around a gateway, a tracer (use
    /// `Arc::new(layer0::NullTracer)` for none), and a config.
    pub fn new(gateway: Arc<dyn Gateway>, tracer: Arc<dyn Tracer>, config: BrokerConfig) -> Self {
        Self {
            gateway,
            tracer,
            config,
        }
    }

    /// Drive `messages` to a terminal response, recursing through the
    /// tool-call loop as needed.
    ///
    /// `correlation_key` is shared across every gateway call and tool
    /// invocation made while servicing this one `generate` call, so a
    /// tracer query can reconstruct the whole turn.
    pub async fn generate(
        &self,
        model: &str,
        mut messages: Vec<Message>,
        tools: &ToolRegistry,
        schema: Option<ResponseSchema>,
        params: GenerationParams,
        correlation_key: &CorrelationKey,
    ) -> Result<GenerateOutput, BrokerError> {
        let mut depth = 0u32;
        loop {
            if depth >= self.config.max_tool_loop_depth {
                return Ok(GenerateOutput::Text(LOOP_EXCEEDED_MESSAGE.to_string()));
            }

            let request = GatewayRequest {
                model: model.to_string(),
                messages: messages.clone(),
                schema: schema.clone(),
                tools: tools.descriptors(),
                params: params.clone(),
            };

            self.tracer
                .record(TracerEvent::LlmCall {
                    correlation_key: correlation_key.clone(),
                    timestamp_ms: now_ms(),
                    model: model.to_string(),
                    messages: serde_json::to_value(&request.messages).unwrap_or_default(),
                    params: serde_json::to_value(&params).unwrap_or_default(),
                })
                .await;

            let start = Instant::now();
            let response = self.gateway.complete(request).await?;
            let duration_ms = start.elapsed().as_millis() as u64;

            self.tracer
                .record(TracerEvent::LlmResponse {
                    correlation_key: correlation_key.clone(),
                    timestamp_ms: now_ms(),
                    content: response.content.clone(),
                    tool_calls: serde_json::to_value(&response.tool_calls).unwrap_or_default(),
                    duration_ms,
                })
                .await;

            if response.has_tool_calls() {
                messages.push(Message::assistant_tool_calls(
                    response.content.clone(),
                    response.tool_calls.clone(),
                ));

                for call in &response.tool_calls {
                    match tools.get(&call.name) {
                        None => {
                            let error_text = format!("tool not found: {}", call.name);
                            messages.push(Message::tool_result(call.id.clone(), error_text));
                        }
                        Some(_) => {
                            let input = arguments_to_value(&call.arguments);
                            let result = tools
                                .invoke(&call.name, input, correlation_key, self.tracer.as_ref())
                                .await;
                            let text = match result {
                                Ok(value) => value.to_string(),
                                Err(err) => err.to_string(),
                            };
                            messages.push(Message::tool_result(call.id.clone(), text));
                        }
                    }
                }

                depth += 1;
                continue;
            }

            if schema.is_some() {
                return match response.object {
                    Some(object) => Ok(GenerateOutput::Object(object)),
                    None => {
                        let raw = response.content.unwrap_or_default();
                        tracing::warn!(
                            model,
                            "schema requested but gateway did not return a parsed object"
                        );
                        Err(BrokerError::SchemaParseFailure { raw })
                    }
                };
            }

            return Ok(GenerateOutput::Text(response.content.unwrap_or_default()));
        }
    }
}

/// Convert the core's `map<string,string>` tool-call argument contract
/// into the JSON object a [`neuron_tool::ToolDyn::call`] expects.
fn arguments_to_value(arguments: &HashMap<String, String>) -> serde_json::Value {
    serde_json::Value::Object(
        arguments
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect(),
    )
}
