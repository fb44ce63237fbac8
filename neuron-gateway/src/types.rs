//! Provider-agnostic message and request/response types — the lingua
//! franca between the broker, the chat session, and gateway adapters.
//!
//! These are not wire types. Each concrete provider adapter (Ollama,
//! Anthropic, OpenAI, ...) translates to and from its own wire format; the
//! core only ever sees these.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a chat message, exactly as named in the wire contract: System,
/// User, Assistant, Tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions. Exempt from chat-session eviction.
    System,
    /// User input.
    User,
    /// Model output.
    Assistant,
    /// Answers a specific tool-call by id.
    Tool,
}

/// An image reference attached to a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageRef {
    /// Base64-encoded image data.
    Base64 {
        /// The base64-encoded data.
        data: String,
        /// MIME type, e.g. `image/png`.
        media_type: String,
    },
    /// URL pointing to an image.
    Url {
        /// The image URL.
        url: String,
    },
}

/// A tool invocation the model has requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-supplied call id, when the provider uses explicit
    /// call-ids. `None` for providers that don't (e.g. Ollama) — the
    /// broker then correlates by position instead.
    pub id: Option<String>,
    /// Name of the tool to invoke.
    pub name: String,
    /// Arguments as a flat string map — the core contract (spec'd as
    /// `map<string,string>`); richer typed arguments are a deliberate
    /// non-goal here, see DESIGN.md.
    pub arguments: HashMap<String, String>,
}

/// One message in a conversation.
///
/// Tuple of {role, optional text content, optional structured object
/// payload, optional tool-call list, optional image references}. A
/// Tool-role message additionally carries `tool_call_id`, the id of the
/// tool-call it answers (required when the provider uses explicit
/// call-ids).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message.
    pub role: Role,
    /// Plain text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Structured payload (e.g. a Tool message's parsed JSON result).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<serde_json::Value>,
    /// Tool calls requested by an Assistant message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Image references attached to this message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageRef>>,
    /// The id of the tool-call this Tool-role message answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Construct a plain-text message with the given role.
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            object: None,
            tool_calls: None,
            images: None,
            tool_call_id: None,
        }
    }

    /// Construct the system prompt message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    /// Construct a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    /// Construct an assistant message carrying tool-calls (and optional
    /// accompanying text).
    pub fn assistant_tool_calls(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            object: None,
            tool_calls: Some(tool_calls),
            images: None,
            tool_call_id: None,
        }
    }

    /// Construct a Tool-role message answering `tool_call_id` with a
    /// stringified result.
    pub fn tool_result(tool_call_id: Option<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            object: None,
            tool_calls: None,
            images: None,
            tool_call_id,
        }
    }
}

/// Optional JSON-Schema describing the shape of a requested structured
/// response.
pub type ResponseSchema = serde_json::Value;

/// Generation parameters for a completion request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationParams {
    /// Sampling temperature. Some providers reject anything but a fixed
    /// value; the capability adapter rewrites or drops this.
    pub temperature: Option<f64>,
    /// Maximum tokens of conversation context the provider should accept.
    pub max_context_tokens: Option<u32>,
    /// Maximum tokens the model may emit in its response.
    pub max_output_tokens: Option<u32>,
    /// Reasoning-effort tag (e.g. `"low"`, `"high"`) for models that
    /// support a reasoning-effort dial. Dropped by the adapter for models
    /// that don't.
    pub reasoning_effort: Option<String>,
}

/// Request sent to a gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRequest {
    /// Model to use.
    pub model: String,
    /// Conversation messages.
    pub messages: Vec<Message>,
    /// Optional JSON-Schema for a structured-output request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<ResponseSchema>,
    /// Tool descriptors, passed opaquely — the core never interprets
    /// their shape beyond "JSON object handed to the provider".
    #[serde(default)]
    pub tools: Vec<serde_json::Value>,
    /// Generation parameters.
    pub params: GenerationParams,
}

/// Response from a gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayResponse {
    /// Text content, if the model produced any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Parsed structured object, present iff a schema was requested and
    /// parsing succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<serde_json::Value>,
    /// Tool calls requested by the model, in the order the model emitted
    /// them.
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl GatewayResponse {
    /// Whether the model asked for one or more tools to be invoked.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
