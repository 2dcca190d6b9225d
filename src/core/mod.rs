//! Core audit abstractions: events, schema binding, dialects, and write paths.

pub mod accessor;
pub mod command;
pub mod datasource;
pub mod dialect;
pub mod error;
pub mod event;
pub mod gate;
pub mod mapping;
pub mod post_processor;
pub mod statement;
pub mod trail;
pub mod value;

pub use accessor::Accessor;
pub use command::{AuditCallback, BatchCommand, Batcher, InsertCommand};
pub use datasource::{Connection, DataSource, TransactionRunner, UnitOfWork};
pub use dialect::{Dialect, IDENTITY_COLUMN, IDENTITY_SEQUENCE};
pub use error::{AppResult, AuditError, ConfigError, DbError, DbErrorKind};
pub use event::{AuditEvent, AuditRecord};
pub use gate::SeverityGate;
pub use mapping::{default_mapping, with_additional, ColumnMapping, DEFAULT_TABLE};
pub use post_processor::{
    FnPostProcessor, IdentityPostProcessor, MessagePostProcessor, TruncatingPostProcessor,
};
pub use statement::{BoundSchema, StatementBuilder};
pub use trail::{AuditTrail, BatchingAuditTrail, TrailStats};
pub use value::SqlValue;
