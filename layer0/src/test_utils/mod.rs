//! In-memory test helpers. Available behind the `test-utils` feature flag.
//! These are minimal implementations that prove the trait APIs are usable;
//! they are not meant as production handlers.

mod collecting_handler;
mod echo_handler;

pub use collecting_handler::CollectingHandler;
pub use echo_handler::EchoHandler;
