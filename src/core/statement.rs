//! One-time statement construction and schema binding.
//!
//! The builder resolves every mapping entry to an accessor on the event type,
//! renders the insert for the detected dialect, and freezes the result into a
//! [`BoundSchema`] that all writers share read-only.

use std::any::type_name;

use super::mapping::is_valid_identifier;
use super::{Accessor, AuditRecord, ColumnMapping, ConfigError, Dialect, SqlValue};

/// Frozen insert statement plus the accessors feeding its placeholders.
///
/// `accessors()[i]` reads `mapping[i].property`, and the mapped columns
/// appear in the same order in the SQL text.
#[derive(Debug)]
pub struct BoundSchema<E> {
    table: String,
    dialect: Dialect,
    columns: Vec<String>,
    accessors: Vec<Accessor<E>>,
    sql: String,
}

impl<E> BoundSchema<E> {
    /// Finished insert statement.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Dialect the statement was rendered for.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Target table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Mapped columns in statement order, excluding any identity column.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Accessors aligned by index with [`Self::columns`].
    #[must_use]
    pub fn accessors(&self) -> &[Accessor<E>] {
        &self.accessors
    }

    /// Number of positional parameters each row binds.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.accessors.len() + usize::from(self.dialect.binds_identity())
    }
}

impl<E: AuditRecord> BoundSchema<E> {
    /// Read the current parameter values from `event`, in placeholder order.
    pub fn bind(&self, event: &E) -> Vec<SqlValue> {
        let mut row = Vec::with_capacity(self.parameter_count());
        if self.dialect.binds_identity() {
            row.push(event.sequence_id().into());
        }
        row.extend(self.accessors.iter().map(|a| a.read(event)));
        row
    }
}

/// Renders an insert statement for a table and mapping list.
#[derive(Debug, Clone, Copy)]
pub struct StatementBuilder<'a> {
    table: &'a str,
    mapping: &'a [ColumnMapping],
}

impl<'a> StatementBuilder<'a> {
    /// Create a builder over `table` and `mapping`.
    #[must_use]
    pub const fn new(table: &'a str, mapping: &'a [ColumnMapping]) -> Self {
        Self { table, mapping }
    }

    /// Bind every mapping entry against `E` and render the statement.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Invalid` if the table or a column is not a plain identifier
    /// - `ConfigError::MissingProperty` if `E` cannot read a mapped property
    pub fn build<E: AuditRecord>(&self, dialect: Dialect) -> Result<BoundSchema<E>, ConfigError> {
        if !is_valid_identifier(self.table) {
            return Err(ConfigError::Invalid(format!(
                "table name `{}` is not a valid identifier",
                self.table
            )));
        }

        let mut accessors = Vec::with_capacity(self.mapping.len());
        let mut columns = Vec::with_capacity(self.mapping.len());
        for entry in self.mapping {
            if !is_valid_identifier(&entry.column) {
                return Err(ConfigError::Invalid(format!(
                    "column name `{}` is not a valid identifier",
                    entry.column
                )));
            }
            let accessor =
                E::accessor(&entry.property).ok_or_else(|| ConfigError::MissingProperty {
                    property: entry.property.clone(),
                    event_type: type_name::<E>(),
                })?;
            accessors.push(accessor);
            columns.push(entry.column.clone());
        }

        if columns.is_empty() && !dialect.binds_identity() {
            tracing::warn!(
                table = self.table,
                "empty mapping on a generic dialect yields an insert without placeholders"
            );
        }

        let sql = render(self.table, dialect, &columns);
        tracing::debug!(sql = %sql, "bound audit trail statement");

        Ok(BoundSchema {
            table: self.table.to_owned(),
            dialect,
            columns,
            accessors,
            sql,
        })
    }
}

fn render(table: &str, dialect: Dialect, columns: &[String]) -> String {
    let mut names: Vec<&str> = Vec::with_capacity(columns.len() + 1);
    let mut placeholders: Vec<&str> = Vec::with_capacity(columns.len() + 1);
    if let (Some(column), Some(placeholder)) =
        (dialect.identity_column(), dialect.identity_placeholder())
    {
        names.push(column);
        placeholders.push(placeholder);
    }
    for column in columns {
        names.push(column);
        placeholders.push("?");
    }
    format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        names.join(","),
        placeholders.join(",")
    )
}
