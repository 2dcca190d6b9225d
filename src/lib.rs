//! # Batching Audit Trail
//!
//! Schema-mapped, dialect-aware persistence of audit events.
//!
//! An audit trail binds a configurable property-to-column mapping against an
//! event type once at startup, renders a single insert statement for the
//! detected database dialect, and then writes events through one of two paths:
//!
//! - **Synchronous**: `sync_log` runs the insert inside a transaction runner
//!   that re-executes it on transient failure, and reports the outcome
//! - **Batched**: `async_log` hands an insert command to a batching engine
//!   and reports the outcome to an optional callback
//!
//! Events above the severity threshold are ignored before any work is done,
//! and each message passes through a post-processor exactly once.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use batching_audit_trail::builders::AuditTrailBuilder;
//! use batching_audit_trail::config::BatcherConfig;
//! use batching_audit_trail::core::{AuditEvent, AuditTrail, InsertCommand};
//! use batching_audit_trail::infra::{InMemoryDataSource, ThreadBatcher};
//!
//! # fn main() -> Result<(), batching_audit_trail::core::AuditError> {
//! let data_source = Arc::new(InMemoryDataSource::generic());
//! let batcher: Arc<ThreadBatcher<InsertCommand<AuditEvent>>> =
//!     Arc::new(ThreadBatcher::new(BatcherConfig::new(), data_source.clone())?);
//!
//! let trail = AuditTrailBuilder::<AuditEvent>::new()
//!     .level(5)
//!     .data_source(data_source)
//!     .batcher(batcher.clone())
//!     .build()?;
//!
//! trail.sync_log(AuditEvent::new(1, "order accepted").with_conversation_id("c-42"))?;
//! trail.async_log(AuditEvent::new(3, "payment pending"));
//!
//! batcher.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! Configuration can also be loaded from JSON or the environment, see
//! [`config::AuditTrailConfig`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Events, schema binding, dialects, and the audit trail itself.
pub mod core;
/// Configuration models for the trail and its batcher.
pub mod config;
/// Builders to start audit trails from configuration.
pub mod builders;
/// Reference datasource, transaction runner, and batcher.
pub mod infra;
/// Async runtime integration.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::builders::AuditTrailBuilder;
pub use crate::core::{
    AuditError, AuditEvent, AuditRecord, AuditTrail, BatchingAuditTrail, SqlValue,
};
