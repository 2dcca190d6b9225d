//! Async runtime integration.

pub mod completion;

pub use completion::{completion_channel, Completion, CompletionCallback};
