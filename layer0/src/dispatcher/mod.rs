//! The Event Dispatcher — cooperative and concurrent execution models,
//! selected at wiring time (§5 of the spec this crate implements).

pub mod concurrent;
pub mod cooperative;

pub use concurrent::ConcurrentDispatcher;
pub use cooperative::{CooperativeDispatcher, DispatcherConfig};
