//! Tests for error types

use batching_audit_trail::core::{AuditError, ConfigError, DbError, DbErrorKind};
use std::error::Error;

#[test]
fn test_db_error_display() {
    let err = DbError::transient("deadlock detected");
    assert_eq!(format!("{}", err), "transient database error: deadlock detected");
    assert_eq!(err.kind(), DbErrorKind::Transient);

    let err = DbError::permanent("unique constraint violated");
    assert_eq!(format!("{}", err), "permanent database error: unique constraint violated");
    assert!(!err.is_transient());
}

#[test]
fn test_missing_property_error() {
    let err = ConfigError::MissingProperty {
        property: "tenant".to_string(),
        event_type: "app::OrderEvent",
    };
    assert_eq!(
        format!("{}", err),
        "cannot find read accessor for property 'tenant' in type 'app::OrderEvent'"
    );
}

#[test]
fn test_config_error_is_transparent() {
    let err = AuditError::from(ConfigError::Invalid("table is empty".to_string()));
    assert_eq!(format!("{}", err), "invalid configuration: table is empty");
}

#[test]
fn test_persistence_error_keeps_source() {
    let err = AuditError::Persistence(DbError::transient("timeout"));
    assert_eq!(format!("{}", err), "audit write failed: transient database error: timeout");
    let source = err.source().unwrap();
    assert_eq!(source.to_string(), "transient database error: timeout");
}

#[test]
fn test_not_configured_error() {
    let err = AuditError::NotConfigured("batcher");
    assert_eq!(format!("{}", err), "batcher not configured");
}

#[test]
fn test_rejected_error() {
    let err = AuditError::Rejected("queue is full".to_string());
    assert_eq!(format!("{}", err), "batch command rejected: queue is full");
}

#[test]
fn test_dialect_detection_error() {
    let err = AuditError::DialectDetection(DbError::transient("connection refused"));
    assert_eq!(
        format!("{}", err),
        "dialect detection failed: transient database error: connection refused"
    );
}
