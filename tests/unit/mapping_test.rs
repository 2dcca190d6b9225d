//! Tests for mapping tables

use batching_audit_trail::core::{
    default_mapping, with_additional, AuditEvent, AuditRecord, ColumnMapping, DEFAULT_TABLE,
};

#[test]
fn test_default_table() {
    assert_eq!(DEFAULT_TABLE, "COP_AUDIT_TRAIL_EVENT");
}

#[test]
fn test_default_mapping_columns_in_order() {
    let columns: Vec<String> = default_mapping().into_iter().map(|m| m.column).collect();
    assert_eq!(
        columns,
        [
            "LOGLEVEL",
            "OCCURRENCE",
            "CONVERSATION_ID",
            "CONTEXT",
            "INSTANCE_ID",
            "CORRELATION_ID",
            "TRANSACTION_ID",
            "MESSAGE_TYPE",
            "LONG_MESSAGE",
        ]
    );
}

#[test]
fn test_default_mapping_properties_are_readable() {
    for entry in default_mapping() {
        assert!(
            AuditEvent::accessor(&entry.property).is_some(),
            "no accessor for {}",
            entry.property
        );
    }
}

#[test]
fn test_additional_entries_come_first() {
    let merged = with_additional(
        &[ColumnMapping::new("sequence_id", "EVENT_NO")],
        &default_mapping(),
    );
    assert_eq!(merged.len(), 10);
    assert_eq!(merged[0], ColumnMapping::new("sequence_id", "EVENT_NO"));
    assert_eq!(merged[1].column, "LOGLEVEL");
    assert_eq!(merged[9].column, "LONG_MESSAGE");
}

#[test]
fn test_mapping_serde() {
    let json = r#"{"property":"context","column":"CTX"}"#;
    let entry: ColumnMapping = serde_json::from_str(json).unwrap();
    assert_eq!(entry, ColumnMapping::new("context", "CTX"));
}
