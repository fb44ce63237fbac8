//! A chat session backed by a scripted gateway and one tool.
//!
//! Demonstrates the broker's tool-call loop end to end without a network
//! call: a mock `Gateway` first asks for the `resolve_date` tool, then
//! answers using its result. No API key or local model required.
//!
//! Run with: `cargo run --example chat_with_tool -p neuron`

use async_trait::async_trait;
use neuron::prelude::*;
use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

struct ScriptedGateway {
    responses: Mutex<VecDeque<GatewayResponse>>,
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn complete(&self, _request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted gateway ran out of responses"))
    }
}

struct DateResolver;

impl ToolDyn for DateResolver {
    fn name(&self) -> &str {
        "resolve_date"
    }
    fn description(&self) -> &str {
        "Resolves a relative date reference (e.g. \"Friday\") to an absolute date."
    }
    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object", "properties": {"date": {"type": "string"}}})
    }
    fn call(
        &self,
        _input: serde_json::Value,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>>
    {
        Box::pin(async move { Ok(serde_json::json!({ "resolved_date": "2024-03-01" })) })
    }
}

#[tokio::main]
async fn main() {
    let mut tool_call_args = HashMap::new();
    tool_call_args.insert("date".to_string(), "Friday".to_string());

    let gateway = Arc::new(ScriptedGateway {
        responses: Mutex::new(VecDeque::from([
            GatewayResponse {
                content: None,
                object: None,
                tool_calls: vec![ToolCall {
                    id: Some("call_1".into()),
                    name: "resolve_date".into(),
                    arguments: tool_call_args,
                }],
            },
            GatewayResponse {
                content: Some("Friday is 2024-03-01.".into()),
                object: None,
                tool_calls: vec![],
            },
        ])),
    });

    let tracer = Arc::new(InMemoryTracer::new());
    let broker = Arc::new(Broker::new(gateway, tracer.clone(), BrokerConfig::default()));

    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(DateResolver));

    let mut chat = ChatSession::new(
        broker,
        Arc::new(WhitespaceTokenizer),
        tools,
        "mock-model",
        "You are a helpful assistant.",
        GenerationParams::default(),
        ChatSessionConfig::default(),
    );

    let reply = chat.send("What is the date this Friday?").await.unwrap();
    println!("assistant: {reply}");
    println!("llm_call events traced: {}", tracer.by_type("llm_call").len());
    println!("tool_call events traced: {}", tracer.by_type("tool_call").len());
}
