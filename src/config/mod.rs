//! Configuration models for the audit trail and its batcher.

pub mod batcher;
pub mod trail;

pub use batcher::BatcherConfig;
pub use trail::{AuditTrailConfig, RetryConfig};
