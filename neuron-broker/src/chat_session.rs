//! Bounded-token chat session — a conversation buffer that keeps the
//! system prompt and evicts the oldest non-system messages once the
//! configured token budget is exceeded.

use crate::broker::Broker;
use crate::error::BrokerError;
use layer0::CorrelationKey;
use neuron_gateway::{GenerationParams, Message, Role};
use neuron_tool::ToolRegistry;
use std::sync::Arc;

/// Counts tokens in a message's text content.
///
/// Swappable so a real model-specific tokenizer (tiktoken, sentencepiece,
/// ...) can replace the default word-count approximation without touching
/// [`ChatSession`].
pub trait Tokenizer: Send + Sync {
    /// Token count for `text`. Implementations must return `0` for an
    /// empty string.
    fn count(&self, text: &str) -> u32;
}

/// Default tokenizer: counts whitespace-delimited words. Cheap,
/// dependency-free, and good enough for budget-shaping tests; a real
/// deployment should plug in the tokenizer matching its model.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn count(&self, text: &str) -> u32 {
        text.split_whitespace().count() as u32
    }
}

/// Wiring-time configuration for [`ChatSession`].
#[derive(Debug, Clone)]
pub struct ChatSessionConfig {
    /// Maximum total token count across all buffered messages, system
    /// prompt included.
    pub max_context_tokens: u32,
}

impl Default for ChatSessionConfig {
    fn default() -> Self {
        Self {
            max_context_tokens: 8192,
        }
    }
}

struct SizedMessage {
    message: Message,
    tokens: u32,
}

/// An ordered, token-budgeted message buffer for one conversation.
///
/// The system prompt occupies index 0 and is never evicted. Every other
/// message is evicted FIFO (oldest first) once the running token total
/// exceeds [`ChatSessionConfig::max_context_tokens`].
pub struct ChatSession {
    broker: Arc<Broker>,
    tokenizer: Arc<dyn Tokenizer>,
    tools: ToolRegistry,
    model: String,
    params: GenerationParams,
    config: ChatSessionConfig,
    messages: Vec<SizedMessage>,
}

impl ChatSession {
    /// Start a session with a system prompt. The system prompt is inserted
    /// first and is exempt from eviction regardless of its token cost.
    pub fn new(
        broker: Arc<Broker>,
        tokenizer: Arc<dyn Tokenizer>,
        tools: ToolRegistry,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        params: GenerationParams,
        config: ChatSessionConfig,
    ) -> Self {
        let mut session = Self {
            broker,
            tokenizer,
            tools,
            model: model.into(),
            params,
            config,
            messages: Vec::new(),
        };
        session.insert(Message::system(system_prompt));
        session
    }

    /// Append a message, applying token-budget eviction afterward.
    ///
    /// Eviction never removes index 0 — a session whose budget can't even
    /// hold the system prompt simply stays over budget rather than losing
    /// it.
    pub fn insert(&mut self, message: Message) {
        let tokens = self.tokenizer.count(message.content.as_deref().unwrap_or(""));
        self.messages.push(SizedMessage { message, tokens });
        self.evict_if_needed();
    }

    fn evict_if_needed(&mut self) {
        while self.total_tokens() > self.config.max_context_tokens && self.messages.len() > 1 {
            self.messages.remove(1);
        }
    }

    /// Sum of token counts across every buffered message.
    pub fn total_tokens(&self) -> u32 {
        self.messages.iter().map(|m| m.tokens).sum()
    }

    /// Number of buffered messages, system prompt included.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the buffer holds no messages at all (never true after
    /// construction, since the system prompt always occupies index 0).
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The buffered messages in order, system prompt first.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.iter().map(|m| m.message.clone()).collect()
    }

    /// Append a User message, drive it through the broker (executing any
    /// tool-calls transparently), append the resulting Assistant message,
    /// and return its text.
    pub async fn send(&mut self, user_text: impl Into<String>) -> Result<String, BrokerError> {
        self.insert(Message::user(user_text));
        let correlation_key = CorrelationKey::generate();

        let output = self
            .broker
            .generate(
                &self.model,
                self.messages(),
                &self.tools,
                None,
                self.params.clone(),
                &correlation_key,
            )
            .await?;

        let text = output.into_text();
        self.insert(Message::text(Role::Assistant, text.clone()));
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::BrokerConfig;
    use async_trait::async_trait;
    use layer0::{InMemoryTracer, NullTracer};
    use neuron_gateway::{Gateway, GatewayError, GatewayRequest, GatewayResponse};

    struct EchoGateway;

    #[async_trait]
    impl Gateway for EchoGateway {
        async fn complete(
            &self,
            request: GatewayRequest,
        ) -> Result<GatewayResponse, GatewayError> {
            let last_user = request
                .messages
                .iter()
                .rev()
                .find(|m| m.role == Role::User)
                .and_then(|m| m.content.clone())
                .unwrap_or_default();
            Ok(GatewayResponse {
                content: Some(format!("echo: {last_user}")),
                object: None,
                tool_calls: vec![],
            })
        }
    }

    fn session(max_context_tokens: u32) -> ChatSession {
        let broker = Arc::new(Broker::new(
            Arc::new(EchoGateway),
            Arc::new(NullTracer),
            BrokerConfig::default(),
        ));
        ChatSession::new(
            broker,
            Arc::new(WhitespaceTokenizer),
            ToolRegistry::new(),
            "mock-model",
            "you are a helpful assistant",
            GenerationParams::default(),
            ChatSessionConfig { max_context_tokens },
        )
    }

    #[test]
    fn whitespace_tokenizer_counts_words() {
        let tokenizer = WhitespaceTokenizer;
        assert_eq!(tokenizer.count(""), 0);
        assert_eq!(tokenizer.count("one two three"), 3);
    }

    #[test]
    fn system_prompt_occupies_index_zero_and_counts_tokens() {
        let chat = session(1000);
        assert_eq!(chat.len(), 1);
        assert_eq!(chat.messages()[0].role, Role::System);
        assert!(chat.total_tokens() > 0);
    }

    #[tokio::test]
    async fn s3_eviction_preserves_system_prompt_under_budget() {
        // System prompt is 4 words; budget just above that, so a big
        // follow-up insertion must evict to stay within budget while the
        // system prompt survives.
        let mut chat = session(6);
        chat.insert(Message::user("one two three four five six seven"));
        assert_eq!(chat.messages()[0].role, Role::System);
        assert!(chat.total_tokens() <= 6 || chat.len() == 1);
    }

    #[test]
    fn budget_equal_to_system_prompt_evicts_every_non_system_message() {
        let system_tokens = session(u32::MAX).total_tokens();
        let mut chat = session(system_tokens);
        chat.insert(Message::user("this is a much longer user message here"));
        assert_eq!(chat.len(), 1);
        assert_eq!(chat.messages()[0].role, Role::System);
    }

    #[tokio::test]
    async fn send_appends_user_and_assistant_messages() {
        let mut chat = session(10_000);
        let reply = chat.send("hello there").await.unwrap();
        assert_eq!(reply, "echo: hello there");
        assert_eq!(chat.len(), 3);
        assert_eq!(chat.messages()[1].role, Role::User);
        assert_eq!(chat.messages()[2].role, Role::Assistant);
    }

    #[tokio::test]
    async fn gateway_failure_propagates_without_appending_assistant_message() {
        struct FailingGateway;
        #[async_trait]
        impl Gateway for FailingGateway {
            async fn complete(
                &self,
                _request: GatewayRequest,
            ) -> Result<GatewayResponse, GatewayError> {
                Err(GatewayError::RateLimited)
            }
        }

        let broker = Arc::new(Broker::new(
            Arc::new(FailingGateway),
            Arc::new(InMemoryTracer::new()),
            BrokerConfig::default(),
        ));
        let mut chat = ChatSession::new(
            broker,
            Arc::new(WhitespaceTokenizer),
            ToolRegistry::new(),
            "mock-model",
            "system prompt",
            GenerationParams::default(),
            ChatSessionConfig::default(),
        );

        let before = chat.len();
        let err = chat.send("hi").await.unwrap_err();
        assert!(matches!(err, BrokerError::Gateway(GatewayError::RateLimited)));
        // The User message is still appended; only the Assistant reply is not.
        assert_eq!(chat.len(), before + 1);
    }
}
