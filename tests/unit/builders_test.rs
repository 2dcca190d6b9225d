//! Tests for builder modules

use std::sync::Arc;

use batching_audit_trail::builders::AuditTrailBuilder;
use batching_audit_trail::config::AuditTrailConfig;
use batching_audit_trail::core::{
    AuditError, AuditEvent, AuditTrail, ColumnMapping, ConfigError, Dialect,
};
use batching_audit_trail::infra::InMemoryDataSource;

#[test]
fn test_builder_defaults() {
    let builder = AuditTrailBuilder::<AuditEvent>::new();
    assert_eq!(builder.config(), &AuditTrailConfig::default());
}

#[test]
fn test_builder_setters() {
    let builder = AuditTrailBuilder::<AuditEvent>::new()
        .table("APP_AUDIT")
        .level(2)
        .mapping(vec![ColumnMapping::new("message", "MSG")]);
    assert_eq!(builder.config().table, "APP_AUDIT");
    assert_eq!(builder.config().level, 2);
    assert_eq!(builder.config().mapping.len(), 1);
}

#[test]
fn test_builder_from_config() {
    let cfg = AuditTrailConfig {
        level: 1,
        ..AuditTrailConfig::default()
    };
    let trail = AuditTrailBuilder::<AuditEvent>::from_config(cfg)
        .data_source(Arc::new(InMemoryDataSource::oracle()))
        .build()
        .unwrap();
    assert_eq!(trail.level(), 1);
    assert_eq!(trail.dialect(), Dialect::Sequence);
    assert!(trail.sql().starts_with("INSERT INTO COP_AUDIT_TRAIL_EVENT (SEQ_ID,LOGLEVEL,"));
}

#[test]
fn test_builder_unknown_property() {
    let err = AuditTrailBuilder::<AuditEvent>::new()
        .additional_mapping(vec![ColumnMapping::new("tenant", "TENANT")])
        .data_source(Arc::new(InMemoryDataSource::generic()))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        AuditError::Config(ConfigError::MissingProperty { ref property, .. }) if property == "tenant"
    ));
}
