//! Basic usage of the Ollama provider.
//!
//! Make sure Ollama is running locally and run:
//!   cargo run --example basic

use neuron_gateway::{Gateway, GatewayRequest, GenerationParams, Message};
use neuron_provider_ollama::OllamaProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let provider = OllamaProvider::new();

    let request = GatewayRequest {
        model: "llama3.2:1b".into(),
        messages: vec![Message::user("Say hello in one sentence.")],
        schema: None,
        tools: vec![],
        params: GenerationParams {
            max_output_tokens: Some(128),
            ..Default::default()
        },
    };

    let response = provider.complete(request).await?;
    println!("Response: {:?}", response.content);

    Ok(())
}
