//! Reference collaborators: datasource, transaction runner, and batcher.

pub mod batcher;
pub mod datasource;
pub mod transaction;

#[cfg(not(target_arch = "wasm32"))]
pub use batcher::{BatcherStats, ThreadBatcher};
pub use datasource::{InMemoryDataSource, InsertedRow};
pub use transaction::RetryingTransaction;
