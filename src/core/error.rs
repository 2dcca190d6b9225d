//! Error types for audit trail operations.

use std::fmt;

use thiserror::Error;

/// Classification of a database failure reported by a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    /// Re-running the unit of work may succeed (lost connection, deadlock, timeout).
    Transient,
    /// Re-running the unit of work will fail again (constraint violation, bad SQL).
    Permanent,
}

impl fmt::Display for DbErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => write!(f, "transient"),
            Self::Permanent => write!(f, "permanent"),
        }
    }
}

/// Failure reported by a datasource, connection, or transaction runner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} database error: {message}")]
pub struct DbError {
    kind: DbErrorKind,
    message: String,
}

impl DbError {
    /// Create a transient error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: DbErrorKind::Transient,
            message: message.into(),
        }
    }

    /// Create a permanent error.
    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            kind: DbErrorKind::Permanent,
            message: message.into(),
        }
    }

    /// Error classification.
    #[must_use]
    pub const fn kind(&self) -> DbErrorKind {
        self.kind
    }

    /// Whether a retry may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.kind == DbErrorKind::Transient
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Misconfiguration detected while starting an audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A mapping entry names a property the event type cannot read.
    #[error("cannot find read accessor for property '{property}' in type '{event_type}'")]
    MissingProperty {
        /// Property named by the mapping entry.
        property: String,
        /// Fully qualified name of the configured event type.
        event_type: &'static str,
    },
    /// Configuration value failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors produced by audit trail components.
#[derive(Debug, Clone, Error)]
pub enum AuditError {
    /// Startup rejected the configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Database product could not be probed at startup.
    #[error("dialect detection failed: {0}")]
    DialectDetection(#[source] DbError),
    /// Insert failed permanently or after retries were exhausted.
    #[error("audit write failed: {0}")]
    Persistence(#[source] DbError),
    /// A required collaborator was not supplied.
    #[error("{0} not configured")]
    NotConfigured(&'static str),
    /// The batcher refused the command.
    #[error("batch command rejected: {0}")]
    Rejected(String),
    /// A batcher worker thread could not be started.
    #[error("failed to spawn batcher worker: {0}")]
    Spawn(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
