//! The Router — event-type-to-handler mapping consulted by the dispatcher.

use crate::event::Event;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// A callable subscribed to one or more event types.
///
/// A single trait serves both execution models. The cooperative dispatcher
/// calls [`Handler::handle`] directly on its own stack. The concurrent
/// dispatcher always calls [`Handler::handle_async`], whose default body
/// just delegates to `handle` — so a purely-synchronous handler needs no
/// async code at all, while a handler with real asynchronous work
/// overrides `handle_async` (and `is_async_capable`) and never has its
/// `handle` called. This is compile-time polymorphism over one trait
/// rather than runtime `hasattr`-style probing: which method actually runs
/// falls out of ordinary virtual dispatch.
#[async_trait]
pub trait Handler: Send + Sync {
    /// A label for this handler, used in tracer records and log lines.
    fn name(&self) -> &str;

    /// Synchronous entry point. Always what the cooperative dispatcher
    /// calls; the default `handle_async` delegates here too.
    fn handle(&self, event: &Event) -> Vec<Event>;

    /// Whether this handler overrides `handle_async` with real async work.
    /// Purely advisory — used for tracer/log detail, never branched on by
    /// the dispatchers themselves (both always call the method appropriate
    /// to their model; the concurrent dispatcher always awaits
    /// `handle_async`, which falls back to `handle` when not overridden).
    fn is_async_capable(&self) -> bool {
        false
    }

    /// Asynchronous entry point. Override for handlers whose work
    /// genuinely awaits something (a gateway call, I/O); the default just
    /// runs the synchronous path.
    async fn handle_async(&self, event: &Event) -> Vec<Event> {
        self.handle(event)
    }
}

/// Mapping from event type to an ordered sequence of handler references.
///
/// Built at wiring time. Registration order is delivery order — this is
/// significant and deterministic. A handler may be registered under
/// multiple event types; double-registering the same handler under the
/// same type yields double-delivery (idempotence is not guaranteed, by
/// design — it is cheaper for the router not to compare handler identity).
#[derive(Default)]
pub struct Router {
    routes: HashMap<String, Vec<Arc<dyn Handler>>>,
}

impl Router {
    /// Create an empty router.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Append `handler` to the ordered list for `event_type`.
    pub fn register(&mut self, event_type: impl Into<String>, handler: Arc<dyn Handler>) {
        self.routes.entry(event_type.into()).or_default().push(handler);
    }

    /// Resolve the ordered handler list for an event's exact type.
    ///
    /// Unknown types yield an empty list, never an error — a `RoutingMiss`
    /// is a normal, silently-absorbed outcome (logged at debug by the
    /// dispatcher), not a fault.
    pub fn resolve(&self, event: &Event) -> Vec<Arc<dyn Handler>> {
        match self.routes.get(&event.event_type) {
            Some(handlers) => handlers.clone(),
            None => {
                tracing::debug!(event_type = %event.event_type, "routing miss");
                Vec::new()
            }
        }
    }

    /// Number of distinct event types with at least one registered handler.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::AgentId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        name: String,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Handler for CountingHandler {
        fn name(&self) -> &str {
            &self.name
        }
        fn handle(&self, _event: &Event) -> Vec<Event> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        }
    }

    #[test]
    fn unknown_type_yields_empty_list() {
        let router = Router::new();
        let event = Event::new("Nope", AgentId::new("x"), serde_json::json!({}));
        assert!(router.resolve(&event).is_empty());
    }

    #[test]
    fn resolve_preserves_registration_order() {
        let mut router = Router::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let h1: Arc<dyn Handler> = Arc::new(CountingHandler {
            name: "h1".into(),
            calls: calls.clone(),
        });
        let h2: Arc<dyn Handler> = Arc::new(CountingHandler {
            name: "h2".into(),
            calls: calls.clone(),
        });
        router.register("Content", h1);
        router.register("Content", h2);

        let event = Event::new("Content", AgentId::new("x"), serde_json::json!({}));
        let resolved = router.resolve(&event);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].name(), "h1");
        assert_eq!(resolved[1].name(), "h2");
    }

    #[test]
    fn double_registration_yields_double_delivery() {
        let mut router = Router::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let h: Arc<dyn Handler> = Arc::new(CountingHandler {
            name: "h".into(),
            calls: calls.clone(),
        });
        router.register("Content", h.clone());
        router.register("Content", h);

        let event = Event::new("Content", AgentId::new("x"), serde_json::json!({}));
        assert_eq!(router.resolve(&event).len(), 2);
    }
}
