//! Typed ID wrappers and correlation-key generation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Typed ID wrappers prevent mixing up correlation keys, agent labels, etc.
/// These are just strings underneath — no format requirement. The protocol
/// doesn't care what your IDs look like.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new typed ID from anything that converts to String.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

typed_id!(
    CorrelationKey,
    "Opaque identifier linking causally related events.\n\nAssigned by the dispatcher on first \
     submission if the submitter did not supply one. Handlers MUST copy it onto any follow-up \
     events they emit — that is how the aggregator correlates arrivals."
);
typed_id!(AgentId, "Opaque label of the producing handler (an event's source).");

impl CorrelationKey {
    /// Generate a fresh, unique opaque correlation key.
    ///
    /// Used by the dispatcher when a submitted event lacks one. This never
    /// collides with a caller-supplied key (v4 UUID), so idempotent
    /// resubmission of the same event instance never triggers a second
    /// assignment — the key is stamped onto the event once, at first
    /// submission.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}
