//! A handler that emits a follow-up event carrying its input payload back.

use crate::event::Event;
use crate::id::AgentId;
use crate::router::Handler;
use async_trait::async_trait;

/// Emits one follow-up event of `reply_type` with the same payload as the
/// event it received, inheriting its correlation key.
pub struct EchoHandler {
    name: String,
    reply_type: String,
}

impl EchoHandler {
    /// Create an echo handler that replies with `reply_type` events.
    pub fn new(name: impl Into<String>, reply_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reply_type: reply_type.into(),
        }
    }
}

#[async_trait]
impl Handler for EchoHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, event: &Event) -> Vec<Event> {
        vec![Event::follow_up(
            self.reply_type.clone(),
            AgentId::new(self.name.clone()),
            event.correlation_key().clone(),
            event.payload.clone(),
        )]
    }
}
