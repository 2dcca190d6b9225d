//! Property-to-column mapping tables.

use serde::{Deserialize, Serialize};

/// Default audit table name.
pub const DEFAULT_TABLE: &str = "COP_AUDIT_TRAIL_EVENT";

/// Binds one event property to one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Property read from the event.
    pub property: String,
    /// Column written in the insert statement.
    pub column: String,
}

impl ColumnMapping {
    /// Create a mapping entry.
    pub fn new(property: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            column: column.into(),
        }
    }
}

/// The nine default entries, in statement column order.
#[must_use]
pub fn default_mapping() -> Vec<ColumnMapping> {
    vec![
        ColumnMapping::new("log_level", "LOGLEVEL"),
        ColumnMapping::new("occurrence", "OCCURRENCE"),
        ColumnMapping::new("conversation_id", "CONVERSATION_ID"),
        ColumnMapping::new("context", "CONTEXT"),
        ColumnMapping::new("instance_id", "INSTANCE_ID"),
        ColumnMapping::new("correlation_id", "CORRELATION_ID"),
        ColumnMapping::new("transaction_id", "TRANSACTION_ID"),
        ColumnMapping::new("message_type", "MESSAGE_TYPE"),
        ColumnMapping::new("message", "LONG_MESSAGE"),
    ]
}

/// Prepend `additional` entries to `base`, keeping `base` as the tail.
#[must_use]
pub fn with_additional(additional: &[ColumnMapping], base: &[ColumnMapping]) -> Vec<ColumnMapping> {
    let mut mapping = Vec::with_capacity(additional.len() + base.len());
    mapping.extend_from_slice(additional);
    mapping.extend_from_slice(base);
    mapping
}

/// Whether `name` is usable verbatim as a table or column identifier.
pub(crate) fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
