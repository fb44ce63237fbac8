#![cfg(feature = "ollama")]
//! Smoke test against a local Ollama instance, reached through the
//! `neuron-gateway::Gateway` boundary via `neuron::ollama::OllamaProvider`.
//!
//! `#[ignore]` by default. Run with:
//!
//!     cargo test -p neuron --features ollama --test smoke_ollama -- --ignored
//!
//! Requires a running `ollama serve` with `llama3.2` pulled.

use neuron::prelude::*;

#[tokio::test]
#[ignore = "requires local Ollama"]
async fn smoke_basic_completion() {
    let provider = OllamaProvider::new();

    let request = GatewayRequest {
        model: "llama3.2".into(),
        messages: vec![Message::user("What is 2+2? Reply with just the number.")],
        schema: None,
        tools: vec![],
        params: GenerationParams {
            temperature: Some(0.0),
            max_output_tokens: Some(64),
            ..Default::default()
        },
    };

    let response = provider.complete(request).await.unwrap();
    let text = response.content.expect("expected text content");
    assert!(text.contains('4'), "expected '4' in response, got: {text}");
}

#[tokio::test]
#[ignore = "requires local Ollama"]
async fn smoke_broker_drives_completion_through_a_real_provider() {
    let gateway = std::sync::Arc::new(OllamaProvider::new());
    let broker = Broker::new(gateway, std::sync::Arc::new(NullTracer), BrokerConfig::default());
    let tools = ToolRegistry::new();
    let key = CorrelationKey::generate();

    let output = broker
        .generate(
            "llama3.2",
            vec![Message::user("Reply with exactly one word: hello")],
            &tools,
            None,
            GenerationParams {
                temperature: Some(0.0),
                max_output_tokens: Some(16),
                ..Default::default()
            },
            &key,
        )
        .await
        .unwrap();

    let text = output.into_text();
    assert!(!text.trim().is_empty());
}
