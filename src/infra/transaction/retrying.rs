//! Transaction runner that re-executes a unit of work on transient failure.

use std::sync::Arc;

use tracing::{error, warn};

use crate::config::RetryConfig;
use crate::core::{DataSource, DbError, TransactionRunner, UnitOfWork};

/// Runs each attempt on a fresh pooled connection inside its own transaction.
///
/// Transient errors are retried up to `max_attempts` in total; permanent
/// errors end the run immediately. There is no backoff between attempts.
pub struct RetryingTransaction {
    data_source: Arc<dyn DataSource>,
    max_attempts: u32,
}

impl RetryingTransaction {
    /// Create a runner over `data_source`.
    #[must_use]
    pub fn new(data_source: Arc<dyn DataSource>, config: &RetryConfig) -> Self {
        Self {
            data_source,
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Total attempts per run.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn attempt(&self, work: &mut UnitOfWork<'_>) -> Result<(), DbError> {
        let mut con = self.data_source.connection()?;
        con.begin()?;
        match work(&mut *con) {
            Ok(()) => con.commit(),
            Err(e) => {
                if let Err(rollback) = con.rollback() {
                    warn!(error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }
}

impl TransactionRunner for RetryingTransaction {
    fn run_with_retry(&self, work: &mut UnitOfWork<'_>) -> Result<(), DbError> {
        let mut attempt = 1;
        loop {
            match self.attempt(work) {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "transient failure, retrying transaction"
                    );
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_transient() {
                        error!(attempts = attempt, error = %e, "transaction retries exhausted");
                    }
                    return Err(e);
                }
            }
        }
    }
}
