//! A handler that records every event it sees, for assertions in tests.

use crate::event::Event;
use crate::router::Handler;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Appends every observed event to a shared, lock-protected buffer.
/// Produces no follow-up events.
pub struct CollectingHandler {
    name: String,
    seen: Arc<Mutex<Vec<Event>>>,
}

impl CollectingHandler {
    /// Create a collecting handler backed by `seen`, so the caller can
    /// inspect it after the dispatcher has drained.
    pub fn new(name: impl Into<String>, seen: Arc<Mutex<Vec<Event>>>) -> Self {
        Self {
            name: name.into(),
            seen,
        }
    }
}

#[async_trait]
impl Handler for CollectingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, event: &Event) -> Vec<Event> {
        self.seen.lock().unwrap().push(event.clone());
        Vec::new()
    }
}
