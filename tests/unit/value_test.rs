//! Tests for bind values

use batching_audit_trail::core::{AuditEvent, AuditRecord};
use batching_audit_trail::SqlValue;

#[test]
fn test_conversions() {
    assert_eq!(SqlValue::from(7_i32), SqlValue::Int(7));
    assert_eq!(SqlValue::from("ctx"), SqlValue::Text("ctx".into()));
    assert_eq!(SqlValue::from(None::<String>), SqlValue::Null);
    assert_eq!(SqlValue::from(Some(9_i64)), SqlValue::Int(9));
}

#[test]
fn test_accessor_values_use_crate_root_type() {
    let event = AuditEvent::new(2, "hello");
    let message: SqlValue = AuditEvent::accessor("message").unwrap().read(&event);
    assert_eq!(message.as_text(), Some("hello"));
    assert!(!message.is_null());

    let context: batching_audit_trail::core::SqlValue =
        AuditEvent::accessor("context").unwrap().read(&event);
    assert!(context.is_null());
}
