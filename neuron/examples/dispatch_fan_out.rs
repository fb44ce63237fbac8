//! Fan-out/fan-in over the cooperative dispatcher.
//!
//! Two classifier handlers react to one `Content` event and each emit a
//! `Classified` event; a collector handler registered for `Classified`
//! observes both, in registration order. This is the S1 scenario this
//! crate's test suite checks for real.
//!
//! Run with: `cargo run --example dispatch_fan_out -p neuron`

use async_trait::async_trait;
use neuron::prelude::*;
use std::sync::{Arc, Mutex};

struct KeywordClassifier {
    name: &'static str,
    keyword: &'static str,
    label: &'static str,
}

#[async_trait]
impl Handler for KeywordClassifier {
    fn name(&self) -> &str {
        self.name
    }

    fn handle(&self, event: &Event) -> Vec<Event> {
        let text = event.payload["text"].as_str().unwrap_or_default();
        let label = if text.to_lowercase().contains(self.keyword) {
            self.label
        } else {
            "other"
        };
        vec![Event::follow_up(
            "Classified",
            AgentId::new(self.name),
            event.correlation_key().clone(),
            serde_json::json!({ "label": label }),
        )]
    }
}

struct Collector {
    seen: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Handler for Collector {
    fn name(&self) -> &str {
        "collector"
    }

    fn handle(&self, event: &Event) -> Vec<Event> {
        let label = event.payload["label"].as_str().unwrap_or_default();
        self.seen.lock().unwrap().push(label.to_string());
        Vec::new()
    }
}

#[tokio::main]
async fn main() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let mut router = Router::new();
    router.register(
        "Content",
        Arc::new(KeywordClassifier {
            name: "greeting_classifier",
            keyword: "hello",
            label: "greeting",
        }),
    );
    router.register(
        "Content",
        Arc::new(KeywordClassifier {
            name: "question_classifier",
            keyword: "?",
            label: "question",
        }),
    );
    router.register("Classified", Arc::new(Collector { seen: seen.clone() }));

    let dispatcher = CooperativeDispatcher::new(
        router,
        Arc::new(NullTracer),
        DispatcherConfig::default(),
    );
    dispatcher.submit(Event::new(
        "Content",
        AgentId::new("submitter"),
        serde_json::json!({ "text": "Hello world" }),
    ));
    dispatcher.run_until_quiescent().await;

    let labels: Vec<String> = seen.lock().unwrap().iter().filter(|l| *l != "other").cloned().collect();
    println!("non-other classifications: {labels:?}");
}
