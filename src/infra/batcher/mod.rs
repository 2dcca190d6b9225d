//! Batching engines.

#[cfg(not(target_arch = "wasm32"))]
pub mod thread;

#[cfg(not(target_arch = "wasm32"))]
pub use thread::{BatcherStats, ThreadBatcher};
