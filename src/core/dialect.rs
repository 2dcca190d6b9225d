//! SQL dialect strategies for identity-column generation.

use serde::{Deserialize, Serialize};

use super::{DataSource, DbError};

/// Identity column prepended on sequence dialects.
pub const IDENTITY_COLUMN: &str = "SEQ_ID";

/// Sequence drawn from when no identity value is supplied.
pub const IDENTITY_SEQUENCE: &str = "COP_SEQ_AUDIT_TRAIL";

const IDENTITY_PLACEHOLDER: &str = "NVL(?,COP_SEQ_AUDIT_TRAIL.NEXTVAL)";

/// Identity handling required by the target database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// The table generates its own key; no identity column is written.
    #[default]
    Generic,
    /// Identity comes from the event or, when absent, from a named sequence.
    Sequence,
}

impl Dialect {
    /// Classify a database product identifier.
    #[must_use]
    pub fn from_product_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("oracle") {
            Self::Sequence
        } else {
            Self::Generic
        }
    }

    /// Probe the database product once through a pooled connection.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's error if no connection can be acquired or
    /// the product name cannot be read.
    pub fn detect(data_source: &dyn DataSource) -> Result<Self, DbError> {
        let mut con = data_source.connection()?;
        let product = con.product_name()?;
        let dialect = Self::from_product_name(&product);
        tracing::info!(product = %product, dialect = ?dialect, "detected database dialect");
        Ok(dialect)
    }

    /// Column clause emitted ahead of the mapped columns.
    #[must_use]
    pub const fn identity_column(self) -> Option<&'static str> {
        match self {
            Self::Generic => None,
            Self::Sequence => Some(IDENTITY_COLUMN),
        }
    }

    /// Placeholder clause paired with [`Self::identity_column`].
    #[must_use]
    pub const fn identity_placeholder(self) -> Option<&'static str> {
        match self {
            Self::Generic => None,
            Self::Sequence => Some(IDENTITY_PLACEHOLDER),
        }
    }

    /// Whether each row binds the event's sequence id first.
    #[must_use]
    pub const fn binds_identity(self) -> bool {
        matches!(self, Self::Sequence)
    }
}
