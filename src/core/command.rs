//! Insert commands and the batching-engine contract they are submitted through.

use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::trail::TrailCounters;
use super::{Accessor, AuditError, AuditRecord, BoundSchema, Connection, DbError, Dialect, SqlValue};

/// Observer notified once about the outcome of an asynchronous write.
pub trait AuditCallback: Send {
    /// The event was durably written.
    fn done(&self);
    /// The event could not be written.
    fn error(&self, error: AuditError);
}

/// A command a [`Batcher`] can execute in homogeneous batches.
pub trait BatchCommand: Send + Sized + 'static {
    /// Execute `batch` against one connection inside the batcher's transaction.
    ///
    /// # Errors
    ///
    /// Returns the first database error; the batcher then fails every command
    /// in the batch.
    fn execute_batch(batch: &[Self], con: &mut dyn Connection) -> Result<(), DbError>;

    /// Report success. Called exactly once unless [`Self::failed`] is called.
    fn completed(self);

    /// Report failure. Called exactly once unless [`Self::completed`] is called.
    fn failed(self, error: AuditError);
}

/// External engine that queues commands and flushes them in batches.
pub trait Batcher<C: BatchCommand>: Send + Sync {
    /// Hand `command` over. Must not block on I/O; a rejected command is
    /// reported through [`BatchCommand::failed`].
    fn submit(&self, command: C);
}

/// One pending insert of an audit event.
pub struct InsertCommand<E: AuditRecord> {
    event: E,
    schema: Arc<BoundSchema<E>>,
    callback: Option<Box<dyn AuditCallback>>,
    counters: Option<Arc<TrailCounters>>,
}

impl<E: AuditRecord> InsertCommand<E> {
    /// Create a command for `event` against a bound `schema`.
    pub fn new(
        event: E,
        schema: Arc<BoundSchema<E>>,
        callback: Option<Box<dyn AuditCallback>>,
    ) -> Self {
        Self {
            event,
            schema,
            callback,
            counters: None,
        }
    }

    pub(crate) fn with_counters(mut self, counters: Arc<TrailCounters>) -> Self {
        self.counters = Some(counters);
        self
    }

    /// Event carried by this command.
    pub const fn event(&self) -> &E {
        &self.event
    }

    /// Dialect the statement was rendered for.
    pub fn dialect(&self) -> Dialect {
        self.schema.dialect()
    }

    /// Finished insert statement.
    pub fn statement(&self) -> &str {
        self.schema.sql()
    }

    /// Accessors feeding the mapped placeholders.
    pub fn accessors(&self) -> &[Accessor<E>] {
        self.schema.accessors()
    }

    /// Parameter values for this row, in placeholder order.
    pub fn bind_values(&self) -> Vec<SqlValue> {
        self.schema.bind(&self.event)
    }
}

impl<E: AuditRecord> BatchCommand for InsertCommand<E> {
    fn execute_batch(batch: &[Self], con: &mut dyn Connection) -> Result<(), DbError> {
        for group in batch.chunk_by(|a, b| Arc::ptr_eq(&a.schema, &b.schema)) {
            let rows: Vec<Vec<SqlValue>> = group.iter().map(Self::bind_values).collect();
            tracing::debug!(rows = rows.len(), table = group[0].schema.table(), "executing audit insert batch");
            con.execute_batch(group[0].statement(), &rows)?;
        }
        Ok(())
    }

    fn completed(self) {
        if let Some(counters) = &self.counters {
            counters.async_completed.fetch_add(1, Ordering::Relaxed);
        }
        if let Some(callback) = self.callback {
            callback.done();
        }
    }

    fn failed(self, error: AuditError) {
        if let Some(counters) = &self.counters {
            counters.async_failed.fetch_add(1, Ordering::Relaxed);
        }
        match self.callback {
            Some(callback) => callback.error(error),
            None => tracing::debug!(error = %error, "dropping audit failure without callback"),
        }
    }
}

impl<E: AuditRecord + fmt::Debug> fmt::Debug for InsertCommand<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertCommand")
            .field("event", &self.event)
            .field("statement", &self.statement())
            .field("has_callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}
