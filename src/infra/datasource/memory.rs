//! In-memory datasource with transactional connections and failure injection.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{Connection, DataSource, DbError, SqlValue};

/// A row committed to the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedRow {
    /// Statement the row was inserted with.
    pub sql: String,
    /// Bound parameter values.
    pub values: Vec<SqlValue>,
}

#[derive(Debug, Default)]
struct State {
    committed: Vec<InsertedRow>,
    failures: VecDeque<DbError>,
    unavailable: bool,
    connections_opened: usize,
    executions: usize,
}

#[derive(Debug)]
struct Shared {
    product_name: String,
    state: Mutex<State>,
}

/// In-memory datasource for development and testing.
///
/// Rows written inside a transaction become visible only on commit; a
/// rollback or dropping the connection discards them.
#[derive(Debug, Clone)]
pub struct InMemoryDataSource {
    shared: Arc<Shared>,
}

impl InMemoryDataSource {
    /// Create a datasource reporting `product_name`.
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(Shared {
                product_name: product_name.into(),
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Datasource classified as the generic dialect.
    #[must_use]
    pub fn generic() -> Self {
        Self::new("PostgreSQL")
    }

    /// Datasource classified as the sequence dialect.
    #[must_use]
    pub fn oracle() -> Self {
        Self::new("Oracle")
    }

    /// Fail the next `execute_batch` call with `error`. Calls queue up.
    pub fn fail_next(&self, error: DbError) {
        self.shared.state.lock().failures.push_back(error);
    }

    /// Make connection acquisition fail until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.state.lock().unavailable = unavailable;
    }

    /// Snapshot of committed rows.
    #[must_use]
    pub fn rows(&self) -> Vec<InsertedRow> {
        self.shared.state.lock().committed.clone()
    }

    /// Number of `execute_batch` calls, successful or not.
    #[must_use]
    pub fn executions(&self) -> usize {
        self.shared.state.lock().executions
    }

    /// Number of connections handed out.
    #[must_use]
    pub fn connections_opened(&self) -> usize {
        self.shared.state.lock().connections_opened
    }
}

impl DataSource for InMemoryDataSource {
    fn connection(&self) -> Result<Box<dyn Connection>, DbError> {
        let mut state = self.shared.state.lock();
        if state.unavailable {
            return Err(DbError::transient("connection refused"));
        }
        state.connections_opened += 1;
        Ok(Box::new(InMemoryConnection {
            shared: Arc::clone(&self.shared),
            pending: Vec::new(),
            in_transaction: false,
        }))
    }
}

struct InMemoryConnection {
    shared: Arc<Shared>,
    pending: Vec<InsertedRow>,
    in_transaction: bool,
}

impl Connection for InMemoryConnection {
    fn product_name(&mut self) -> Result<String, DbError> {
        Ok(self.shared.product_name.clone())
    }

    fn begin(&mut self) -> Result<(), DbError> {
        if self.in_transaction {
            return Err(DbError::permanent("transaction already open"));
        }
        self.in_transaction = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DbError> {
        if !self.in_transaction {
            return Err(DbError::permanent("no open transaction"));
        }
        self.in_transaction = false;
        self.shared.state.lock().committed.append(&mut self.pending);
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DbError> {
        self.in_transaction = false;
        self.pending.clear();
        Ok(())
    }

    fn execute_batch(&mut self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<(), DbError> {
        let mut state = self.shared.state.lock();
        state.executions += 1;
        if let Some(error) = state.failures.pop_front() {
            return Err(error);
        }

        let expected = sql.matches('?').count();
        if let Some(row) = rows.iter().find(|row| row.len() != expected) {
            return Err(DbError::permanent(format!(
                "statement expects {expected} parameters, got {}",
                row.len()
            )));
        }

        let inserted = rows.iter().map(|values| InsertedRow {
            sql: sql.to_owned(),
            values: values.clone(),
        });
        if self.in_transaction {
            self.pending.extend(inserted);
        } else {
            state.committed.extend(inserted);
        }
        Ok(())
    }
}
