#![deny(missing_docs)]
//! Tool interface and registry for neuron.
//!
//! Defines the [`ToolDyn`] trait for object-safe tool abstraction and
//! [`ToolRegistry`] for managing collections of tools. Any tool source
//! (local function, MCP server, HTTP endpoint) implements [`ToolDyn`].

use layer0::{now_ms, CorrelationKey, Tracer, TracerEvent};
use serde_json::json;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Errors from tool operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found in the registry.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// Tool execution failed.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The input provided to the tool was invalid.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Object-safe trait for tool implementations.
///
/// Any tool source (local function, MCP server, HTTP endpoint) implements
/// this trait. Tools are stored as `Arc<dyn ToolDyn>` in [`ToolRegistry`].
pub trait ToolDyn: Send + Sync {
    /// The tool's unique name.
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given input.
    fn call(
        &self,
        input: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>>;

    /// The function-calling descriptor handed to a gateway in a
    /// `GatewayRequest`'s tool list: `{"type": "function", "function":
    /// {"name", "description", "parameters"}}`.
    fn descriptor(&self) -> serde_json::Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": self.input_schema(),
            }
        })
    }
}

/// Wrap a tool's textual output in the `{"content": [...]}` result envelope
/// used when a tool's result is fed back to the model as a Tool-role
/// message.
pub fn text_result(text: impl Into<String>) -> serde_json::Value {
    json!({
        "content": [
            { "type": "text", "text": text.into() }
        ]
    })
}

/// Registry of tools available to a turn.
///
/// Holds tools as `Arc<dyn ToolDyn>` keyed by name. The broker's tool-call
/// loop uses this to look up and execute tools requested by the model.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolDyn>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Overwrites any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn ToolDyn>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolDyn>> {
        self.tools.get(name)
    }

    /// Iterate over all registered tools.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ToolDyn>> {
        self.tools.values()
    }

    /// The function-calling descriptors of every registered tool, in the
    /// shape expected in a `GatewayRequest`'s tool list.
    pub fn descriptors(&self) -> Vec<serde_json::Value> {
        self.tools.values().map(|t| t.descriptor()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke `name` with `input`, recording a `ToolCall` tracer event
    /// carrying the arguments and a stringified result (or error) on
    /// completion. Returns `Err(ToolError::NotFound)` without touching the
    /// tracer if the name isn't registered — a lookup miss never happened,
    /// so there's nothing to trace.
    ///
    /// A successful result is wrapped in the standard `text_result` content
    /// envelope before it's returned, since the only consumer of this value
    /// is a Tool-role message handed back to the model.
    pub async fn invoke(
        &self,
        name: &str,
        input: serde_json::Value,
        correlation_key: &CorrelationKey,
        tracer: &dyn Tracer,
    ) -> Result<serde_json::Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        let result = tool.call(input.clone()).await;
        let result_str = match &result {
            Ok(value) => value.to_string(),
            Err(err) => err.to_string(),
        };
        tracer
            .record(TracerEvent::ToolCall {
                correlation_key: correlation_key.clone(),
                timestamp_ms: now_ms(),
                tool: name.to_string(),
                arguments: input,
                result: result_str.clone(),
            })
            .await;
        result.map(|_| text_result(result_str))
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
