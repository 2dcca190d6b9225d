//! Datasource, connection, and transaction-runner contracts consumed by the trail.

use super::{DbError, SqlValue};

/// A pooled database connection. Dropping it releases it back to the pool.
pub trait Connection: Send {
    /// Database product identifier, used for dialect detection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection metadata cannot be read.
    fn product_name(&mut self) -> Result<String, DbError>;

    /// Open a transaction scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    fn begin(&mut self) -> Result<(), DbError>;

    /// Commit the open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails; the outcome is then unknown.
    fn commit(&mut self) -> Result<(), DbError>;

    /// Roll back the open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    fn rollback(&mut self) -> Result<(), DbError>;

    /// Execute `sql` once per row of positional parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if any row fails; the caller rolls back.
    fn execute_batch(&mut self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<(), DbError>;
}

/// Source of pooled connections.
pub trait DataSource: Send + Sync {
    /// Acquire a connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot supply a connection.
    fn connection(&self) -> Result<Box<dyn Connection>, DbError>;
}

/// Unit of work re-executed by a [`TransactionRunner`].
pub type UnitOfWork<'a> = dyn FnMut(&mut dyn Connection) -> Result<(), DbError> + 'a;

/// Runs a unit of work inside a transaction, re-running it on transient failure.
pub trait TransactionRunner: Send + Sync {
    /// Execute `work` until it commits or the retry policy gives up.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted, or the first
    /// permanent error.
    fn run_with_retry(&self, work: &mut UnitOfWork<'_>) -> Result<(), DbError>;
}
