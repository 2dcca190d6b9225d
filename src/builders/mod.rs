//! Builders that assemble audit trails from configuration.

pub mod trail_builder;

pub use trail_builder::AuditTrailBuilder;
