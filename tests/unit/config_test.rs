//! Tests for configuration validation and loading

use batching_audit_trail::config::{AuditTrailConfig, BatcherConfig, RetryConfig};
use batching_audit_trail::core::ColumnMapping;

#[test]
fn test_trail_config_defaults() {
    let cfg = AuditTrailConfig::default();
    assert_eq!(cfg.table, "COP_AUDIT_TRAIL_EVENT");
    assert_eq!(cfg.level, 5);
    assert_eq!(cfg.mapping.len(), 9);
    assert!(cfg.additional_mapping.is_empty());
    assert_eq!(cfg.retry, RetryConfig { max_attempts: 3 });
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_trail_config_invalid_table() {
    let mut cfg = AuditTrailConfig::default();
    cfg.table = "AUDIT; DROP TABLE USERS".to_string();
    assert!(cfg.validate().is_err());

    cfg.table = String::new();
    assert!(cfg.validate().is_err());
}

#[test]
fn test_trail_config_invalid_column() {
    let mut cfg = AuditTrailConfig::default();
    cfg.additional_mapping = vec![ColumnMapping::new("context", "CTX COLUMN")];
    assert!(cfg.validate().is_err());

    cfg.additional_mapping = vec![ColumnMapping::new("", "CTX")];
    assert!(cfg.validate().is_err());
}

#[test]
fn test_trail_config_invalid_retry() {
    let mut cfg = AuditTrailConfig::default();
    cfg.retry.max_attempts = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_trail_config_from_json() {
    let json = r#"{
        "table": "APP_AUDIT",
        "level": 2,
        "mapping": [
            {"property": "log_level", "column": "LVL"},
            {"property": "message", "column": "MSG"}
        ],
        "additional_mapping": [{"property": "context", "column": "CTX"}],
        "retry": {"max_attempts": 5}
    }"#;
    let cfg = AuditTrailConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.table, "APP_AUDIT");
    assert_eq!(cfg.level, 2);
    assert_eq!(cfg.retry.max_attempts, 5);

    let columns: Vec<String> = cfg.effective_mapping().into_iter().map(|m| m.column).collect();
    assert_eq!(columns, ["CTX", "LVL", "MSG"]);
}

#[test]
fn test_trail_config_from_json_fills_defaults() {
    let cfg = AuditTrailConfig::from_json_str(r#"{"level": 1}"#).unwrap();
    assert_eq!(cfg.level, 1);
    assert_eq!(cfg.table, "COP_AUDIT_TRAIL_EVENT");
    assert_eq!(cfg.mapping.len(), 9);
}

#[test]
fn test_trail_config_from_json_rejects_invalid() {
    assert!(AuditTrailConfig::from_json_str("{not json").is_err());
    assert!(AuditTrailConfig::from_json_str(r#"{"table": ""}"#).is_err());
}

#[test]
fn test_trail_config_from_env() {
    // Only test in this binary touching these variables.
    std::env::set_var("AUDIT_TRAIL_TABLE", "ENV_AUDIT");
    std::env::set_var("AUDIT_TRAIL_LEVEL", "7");
    std::env::set_var("AUDIT_TRAIL_RETRY_ATTEMPTS", "4");
    let cfg = AuditTrailConfig::from_env().unwrap();
    assert_eq!(cfg.table, "ENV_AUDIT");
    assert_eq!(cfg.level, 7);
    assert_eq!(cfg.retry.max_attempts, 4);

    std::env::set_var("AUDIT_TRAIL_LEVEL", "verbose");
    let err = AuditTrailConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("AUDIT_TRAIL_LEVEL"));

    std::env::remove_var("AUDIT_TRAIL_TABLE");
    std::env::remove_var("AUDIT_TRAIL_LEVEL");
    std::env::remove_var("AUDIT_TRAIL_RETRY_ATTEMPTS");
}

#[test]
fn test_batcher_config_validation() {
    let cfg = BatcherConfig::new()
        .with_worker_count(2)
        .with_max_queue_depth(16)
        .with_max_batch_size(8);
    assert!(cfg.validate().is_ok());
    assert!(BatcherConfig::default().worker_count >= 1);

    assert!(cfg.clone().with_worker_count(0).validate().is_err());
    assert!(cfg.clone().with_max_queue_depth(0).validate().is_err());
    assert!(cfg.with_max_batch_size(0).validate().is_err());
}
