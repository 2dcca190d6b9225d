//! The audit trail: severity gate, post-processing, and the two write paths.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{
    AuditCallback, AuditError, AuditRecord, BatchCommand, Batcher, BoundSchema, Dialect,
    InsertCommand, MessagePostProcessor, SeverityGate, TransactionRunner,
};

/// Logging surface callers program against.
pub trait AuditTrail<E: AuditRecord>: Send + Sync {
    /// Current severity threshold.
    fn level(&self) -> i32;

    /// Whether events at `level` are processed.
    fn is_enabled(&self, level: i32) -> bool;

    /// Write `event` durably, blocking until it commits or fails permanently.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Persistence` once the transaction runner gives up.
    fn sync_log(&self, event: E) -> Result<(), AuditError>;

    /// Queue `event` for batched writing; the outcome is discarded.
    fn async_log(&self, event: E);

    /// Queue `event` for batched writing and report the outcome to `callback`.
    fn async_log_with_callback(&self, event: E, callback: Box<dyn AuditCallback>);
}

/// Snapshot of trail activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrailStats {
    /// Synchronous writes that committed.
    pub sync_written: u64,
    /// Synchronous writes that failed.
    pub sync_failed: u64,
    /// Commands handed to the batcher.
    pub async_submitted: u64,
    /// Batched commands reported as completed.
    pub async_completed: u64,
    /// Batched commands reported as failed.
    pub async_failed: u64,
}

/// Lock-free counters behind [`TrailStats`].
#[derive(Debug, Default)]
pub(crate) struct TrailCounters {
    pub sync_written: AtomicU64,
    pub sync_failed: AtomicU64,
    pub async_submitted: AtomicU64,
    pub async_completed: AtomicU64,
    pub async_failed: AtomicU64,
}

impl TrailCounters {
    pub fn snapshot(&self) -> TrailStats {
        TrailStats {
            sync_written: self.sync_written.load(Ordering::Relaxed),
            sync_failed: self.sync_failed.load(Ordering::Relaxed),
            async_submitted: self.async_submitted.load(Ordering::Relaxed),
            async_completed: self.async_completed.load(Ordering::Relaxed),
            async_failed: self.async_failed.load(Ordering::Relaxed),
        }
    }
}

/// Database-backed audit trail with a synchronous and a batched write path.
///
/// Built once by [`crate::builders::AuditTrailBuilder`]; afterwards the bound
/// schema is immutable and the trail can be shared across threads with `Arc`.
pub struct BatchingAuditTrail<E: AuditRecord> {
    gate: SeverityGate,
    schema: Arc<BoundSchema<E>>,
    post_processor: Arc<dyn MessagePostProcessor>,
    batcher: Option<Arc<dyn Batcher<InsertCommand<E>>>>,
    transactions: Arc<dyn TransactionRunner>,
    counters: Arc<TrailCounters>,
}

impl<E: AuditRecord> BatchingAuditTrail<E> {
    pub(crate) fn from_parts(
        level: i32,
        schema: BoundSchema<E>,
        post_processor: Arc<dyn MessagePostProcessor>,
        batcher: Option<Arc<dyn Batcher<InsertCommand<E>>>>,
        transactions: Arc<dyn TransactionRunner>,
    ) -> Self {
        Self {
            gate: SeverityGate::new(level),
            schema: Arc::new(schema),
            post_processor,
            batcher,
            transactions,
            counters: Arc::new(TrailCounters::default()),
        }
    }

    /// Bound schema shared by both write paths.
    #[must_use]
    pub fn schema(&self) -> &BoundSchema<E> {
        &self.schema
    }

    /// Finished insert statement.
    #[must_use]
    pub fn sql(&self) -> &str {
        self.schema.sql()
    }

    /// Dialect detected at startup.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.schema.dialect()
    }

    /// Change the severity threshold at runtime.
    pub fn set_level(&self, level: i32) {
        tracing::info!(level, "audit trail level changed");
        self.gate.set_threshold(level);
    }

    /// Current activity counters.
    #[must_use]
    pub fn stats(&self) -> TrailStats {
        self.counters.snapshot()
    }

    fn post_process(&self, mut event: E) -> E {
        let message = std::mem::take(event.message_mut());
        *event.message_mut() = self.post_processor.serialize(message);
        event
    }

    pub(crate) fn submit(&self, event: E, callback: Option<Box<dyn AuditCallback>>) {
        if !self.gate.enabled(event.log_level()) {
            return;
        }
        let event = self.post_process(event);
        let command = InsertCommand::new(event, Arc::clone(&self.schema), callback)
            .with_counters(Arc::clone(&self.counters));

        match &self.batcher {
            Some(batcher) => {
                self.counters.async_submitted.fetch_add(1, Ordering::Relaxed);
                batcher.submit(command);
            }
            None => {
                tracing::warn!("async audit log requested but no batcher is configured");
                command.failed(AuditError::NotConfigured("batcher"));
            }
        }
    }
}

impl<E: AuditRecord> fmt::Debug for BatchingAuditTrail<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchingAuditTrail")
            .field("level", &self.gate.threshold())
            .field("sql", &self.schema.sql())
            .field("has_batcher", &self.batcher.is_some())
            .field("stats", &self.counters.snapshot())
            .finish_non_exhaustive()
    }
}

impl<E: AuditRecord> AuditTrail<E> for BatchingAuditTrail<E> {
    fn level(&self) -> i32 {
        self.gate.threshold()
    }

    fn is_enabled(&self, level: i32) -> bool {
        self.gate.enabled(level)
    }

    fn sync_log(&self, event: E) -> Result<(), AuditError> {
        if !self.gate.enabled(event.log_level()) {
            return Ok(());
        }
        let event = self.post_process(event);
        let command = InsertCommand::new(event, Arc::clone(&self.schema), None);
        let batch = std::slice::from_ref(&command);

        match self
            .transactions
            .run_with_retry(&mut |con| InsertCommand::execute_batch(batch, con))
        {
            Ok(()) => {
                self.counters.sync_written.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.counters.sync_failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(error = %e, "synchronous audit log failed");
                Err(AuditError::Persistence(e))
            }
        }
    }

    fn async_log(&self, event: E) {
        self.submit(event, None);
    }

    fn async_log_with_callback(&self, event: E, callback: Box<dyn AuditCallback>) {
        self.submit(event, Some(callback));
    }
}
