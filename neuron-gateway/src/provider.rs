//! The LLM Gateway interface — a provider-agnostic completion primitive.

use crate::types::{GatewayRequest, GatewayResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from gateway calls. Surfaced to the broker's caller — the
/// broker does not retry by default.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The underlying request (HTTP, local process, ...) failed.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The provider rate-limited the request.
    #[error("rate limited")]
    RateLimited,

    /// Authentication/authorization failed.
    #[error("auth failed: {0}")]
    AuthFailed(String),

    /// The provider's response could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl GatewayError {
    /// Whether retrying this request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::RateLimited | GatewayError::RequestFailed(_))
    }
}

/// Provider-agnostic completion primitive.
///
/// Each concrete provider (Anthropic, OpenAI, Ollama, ...) implements this
/// trait. It is deliberately dyn-safe (`async-trait`, not RPITIT) so the
/// broker and chat session can hold `Arc<dyn Gateway>` and swap providers
/// at wiring time without becoming generic themselves — every other
/// dyn-dispatched boundary in this workspace (`Handler`, `Tracer`,
/// `ToolDyn`) makes the same choice.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send a completion request to the provider.
    async fn complete(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError>;
}
