#![deny(missing_docs)]
//! Ollama local model provider.
//!
//! Implements [`neuron_gateway::Gateway`] against Ollama's `/api/chat`
//! endpoint. Ollama runs models locally: there are no auth headers, and
//! it does not hand back tool-call ids — `ToolCall::id` is left `None`
//! here, and the broker correlates tool results by position instead (see
//! `neuron_gateway::ToolCall`'s docs).

mod types;

use async_trait::async_trait;
use neuron_gateway::{Gateway, GatewayError, GatewayRequest, GatewayResponse, Message, Role, ToolCall};
use std::collections::HashMap;
use types::*;

/// Ollama local model provider.
pub struct OllamaProvider {
    client: reqwest::Client,
    api_url: String,
    keep_alive: Option<String>,
}

impl OllamaProvider {
    /// Create a new Ollama provider pointed at the default local endpoint.
    ///
    /// Defaults to `http://localhost:11434/api/chat`.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: "http://localhost:11434/api/chat".into(),
            keep_alive: None,
        }
    }

    /// Override the API URL (for remote Ollama instances or custom ports).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the `keep_alive` duration for how long Ollama keeps the model
    /// loaded. Examples: `"5m"`, `"0"` (unload immediately), `"-1"` (keep
    /// forever).
    pub fn with_keep_alive(mut self, duration: impl Into<String>) -> Self {
        self.keep_alive = Some(duration.into());
        self
    }

    fn build_request(&self, request: &GatewayRequest) -> OllamaRequest {
        let messages = request.messages.iter().map(ollama_message).collect();
        let tools = request.tools.iter().filter_map(tool_from_descriptor).collect();

        let params = &request.params;
        let options = if params.temperature.is_some()
            || params.max_output_tokens.is_some()
            || params.max_context_tokens.is_some()
        {
            Some(OllamaOptions {
                temperature: params.temperature,
                num_predict: params.max_output_tokens,
                num_ctx: params.max_context_tokens,
                ..Default::default()
            })
        } else {
            None
        };

        OllamaRequest {
            model: request.model.clone(),
            messages,
            stream: false,
            tools,
            keep_alive: self.keep_alive.clone(),
            options,
        }
    }

    /// Parse an Ollama response, attempting a structured-output parse of
    /// the text content when `schema_requested` is set.
    fn parse_response(&self, response: OllamaResponse, schema_requested: bool) -> GatewayResponse {
        let content = (!response.message.content.is_empty()).then(|| response.message.content.clone());

        let tool_calls: Vec<ToolCall> = response
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: None,
                name: tc.function.name,
                arguments: value_to_arguments(&tc.function.arguments),
            })
            .collect();

        let object = if schema_requested {
            content
                .as_deref()
                .and_then(|text| serde_json::from_str(text).ok())
        } else {
            None
        };

        GatewayResponse {
            content,
            object,
            tool_calls,
        }
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gateway for OllamaProvider {
    async fn complete(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        let schema_requested = request.schema.is_some();
        let api_request = self.build_request(&request);

        let http_response = self
            .client
            .post(&self.api_url)
            .header("content-type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let status = http_response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GatewayError::RateLimited);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            let body = http_response.text().await.unwrap_or_default();
            return Err(GatewayError::AuthFailed(body));
        }
        if !status.is_success() {
            let body = http_response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        let api_response: OllamaResponse = http_response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(self.parse_response(api_response, schema_requested))
    }
}

fn ollama_message(message: &Message) -> OllamaMessage {
    let role = match message.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    }
    .to_string();

    let tool_calls = message.tool_calls.as_ref().map(|calls| {
        calls
            .iter()
            .map(|call| OllamaToolCall {
                function: OllamaFunctionCall {
                    name: call.name.clone(),
                    arguments: arguments_to_value(&call.arguments),
                },
            })
            .collect()
    });

    OllamaMessage {
        role,
        content: message.content.clone().unwrap_or_default(),
        tool_calls,
    }
}

fn tool_from_descriptor(descriptor: &serde_json::Value) -> Option<OllamaTool> {
    let function = descriptor.get("function")?;
    Some(OllamaTool {
        tool_type: "function".to_string(),
        function: OllamaFunction {
            name: function.get("name")?.as_str()?.to_string(),
            description: function
                .get("description")
                .and_then(|d| d.as_str())
                .unwrap_or("")
                .to_string(),
            parameters: function
                .get("parameters")
                .cloned()
                .unwrap_or_else(|| serde_json::json!({})),
        },
    })
}

/// Convert the core's `map<string,string>` tool-call argument contract
/// into the JSON object Ollama's wire format expects.
fn arguments_to_value(arguments: &HashMap<String, String>) -> serde_json::Value {
    serde_json::Value::Object(
        arguments
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect(),
    )
}

/// Convert Ollama's JSON-object tool-call arguments back into the core's
/// `map<string,string>` contract. Non-string values are stringified.
fn value_to_arguments(value: &serde_json::Value) -> HashMap<String, String> {
    value
        .as_object()
        .map(|obj| {
            obj.iter()
                .map(|(k, v)| {
                    let s = match v {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), s)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuron_gateway::GenerationParams;
    use serde_json::json;

    #[test]
    fn build_simple_request() {
        let provider = OllamaProvider::new();
        let request = GatewayRequest {
            model: "llama3.2:1b".into(),
            messages: vec![Message::system("Be helpful."), Message::user("Hello")],
            schema: None,
            tools: vec![],
            params: GenerationParams {
                max_output_tokens: Some(256),
                ..Default::default()
            },
        };

        let api_request = provider.build_request(&request);
        assert_eq!(api_request.model, "llama3.2:1b");
        assert!(!api_request.stream);
        assert_eq!(api_request.messages.len(), 2);
        assert_eq!(api_request.messages[0].role, "system");
        assert_eq!(api_request.messages[0].content, "Be helpful.");
        assert_eq!(api_request.messages[1].role, "user");
        assert_eq!(api_request.messages[1].content, "Hello");
        assert_eq!(api_request.options.as_ref().unwrap().num_predict, Some(256));
    }

    #[test]
    fn build_request_no_options_when_nothing_set() {
        let provider = OllamaProvider::new();
        let request = GatewayRequest {
            model: "llama3.2:1b".into(),
            messages: vec![Message::user("Hi")],
            schema: None,
            tools: vec![],
            params: GenerationParams::default(),
        };

        let api_request = provider.build_request(&request);
        assert!(api_request.options.is_none());
    }

    #[test]
    fn build_request_with_tools() {
        let provider = OllamaProvider::new();
        let descriptor = json!({
            "type": "function",
            "function": {
                "name": "bash",
                "description": "Run a command",
                "parameters": {"type": "object"},
            }
        });
        let request = GatewayRequest {
            model: "llama3.2:1b".into(),
            messages: vec![Message::user("Help")],
            schema: None,
            tools: vec![descriptor],
            params: GenerationParams {
                temperature: Some(0.5),
                ..Default::default()
            },
        };

        let api_request = provider.build_request(&request);
        assert_eq!(api_request.tools.len(), 1);
        assert_eq!(api_request.tools[0].function.name, "bash");
        assert_eq!(api_request.options.as_ref().unwrap().temperature, Some(0.5));
    }

    #[test]
    fn assistant_tool_calls_map_to_ollama_tool_calls() {
        let provider = OllamaProvider::new();
        let mut args = HashMap::new();
        args.insert("command".to_string(), "ls".to_string());
        let request = GatewayRequest {
            model: "llama3.2:1b".into(),
            messages: vec![Message::assistant_tool_calls(
                None,
                vec![ToolCall {
                    id: Some("call_1".into()),
                    name: "bash".into(),
                    arguments: args,
                }],
            )],
            schema: None,
            tools: vec![],
            params: GenerationParams::default(),
        };

        let api_request = provider.build_request(&request);
        assert_eq!(api_request.messages[0].role, "assistant");
        let tool_calls = api_request.messages[0].tool_calls.as_ref().unwrap();
        assert_eq!(tool_calls[0].function.name, "bash");
        assert_eq!(tool_calls[0].function.arguments, json!({"command": "ls"}));
    }

    #[test]
    fn tool_result_becomes_tool_role_message() {
        let provider = OllamaProvider::new();
        let request = GatewayRequest {
            model: "llama3.2:1b".into(),
            messages: vec![Message::tool_result(Some("call_1".into()), "file.txt")],
            schema: None,
            tools: vec![],
            params: GenerationParams::default(),
        };

        let api_request = provider.build_request(&request);
        assert_eq!(api_request.messages[0].role, "tool");
        assert_eq!(api_request.messages[0].content, "file.txt");
    }

    fn response_with_text(text: &str) -> OllamaResponse {
        OllamaResponse {
            model: "llama3.2:1b".into(),
            message: OllamaMessage {
                role: "assistant".into(),
                content: text.into(),
                tool_calls: None,
            },
            done: true,
            done_reason: Some("stop".into()),
            total_duration: Some(500_000_000),
            load_duration: Some(100_000_000),
            prompt_eval_count: Some(10),
            prompt_eval_duration: Some(200_000_000),
            eval_count: Some(5),
            eval_duration: Some(200_000_000),
        }
    }

    #[test]
    fn parse_simple_response() {
        let provider = OllamaProvider::new();
        let response = provider.parse_response(response_with_text("Hello!"), false);
        assert_eq!(response.content, Some("Hello!".to_string()));
        assert!(response.tool_calls.is_empty());
        assert!(response.object.is_none());
    }

    #[test]
    fn parse_tool_use_response_leaves_id_none_for_position_correlation() {
        let provider = OllamaProvider::new();
        let mut api_response = response_with_text("");
        api_response.message.tool_calls = Some(vec![OllamaToolCall {
            function: OllamaFunctionCall {
                name: "bash".into(),
                arguments: json!({"command": "ls"}),
            },
        }]);

        let response = provider.parse_response(api_response, false);
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].id, None);
        assert_eq!(response.tool_calls[0].name, "bash");
        assert_eq!(
            response.tool_calls[0].arguments.get("command"),
            Some(&"ls".to_string())
        );
    }

    #[test]
    fn schema_requested_parses_json_content_into_object() {
        let provider = OllamaProvider::new();
        let response = provider.parse_response(response_with_text(r#"{"answer":42}"#), true);
        assert_eq!(response.object, Some(json!({"answer": 42})));
    }

    #[test]
    fn schema_requested_but_content_not_json_leaves_object_none() {
        let provider = OllamaProvider::new();
        let response = provider.parse_response(response_with_text("not json"), true);
        assert!(response.object.is_none());
        assert_eq!(response.content, Some("not json".to_string()));
    }

    #[test]
    fn missing_timing_fields_do_not_affect_parsing() {
        let provider = OllamaProvider::new();
        let mut api_response = response_with_text("hi");
        api_response.prompt_eval_count = None;
        api_response.eval_count = None;
        let response = provider.parse_response(api_response, false);
        assert_eq!(response.content, Some("hi".to_string()));
    }

    #[test]
    fn with_url_overrides_api_url() {
        let provider = OllamaProvider::new().with_url("http://remote:11434/api/chat");
        assert_eq!(provider.api_url, "http://remote:11434/api/chat");
    }

    #[test]
    fn keep_alive_serialized() {
        let provider = OllamaProvider::new().with_keep_alive("5m");
        let request = GatewayRequest {
            model: "llama3.2:1b".into(),
            messages: vec![Message::user("Hi")],
            schema: None,
            tools: vec![],
            params: GenerationParams::default(),
        };
        let api_request = provider.build_request(&request);
        assert_eq!(api_request.keep_alive, Some("5m".into()));
    }

    #[test]
    fn ollama_default_impl() {
        let provider = OllamaProvider::default();
        assert_eq!(provider.api_url, "http://localhost:11434/api/chat");
    }
}
