//! Audit event structure and the record contract writers depend on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Accessor, SqlValue};

/// Contract every persistable audit event type implements.
///
/// Writers only need the severity level, the mutable message and, for
/// sequence dialects, the optional pre-assigned id. Everything else is
/// reached through accessors resolved once at startup.
pub trait AuditRecord: Send + 'static {
    /// Severity level checked against the trail threshold.
    fn log_level(&self) -> i32;

    /// Pre-assigned identity value, bound ahead of the mapped columns on
    /// sequence dialects.
    fn sequence_id(&self) -> Option<i64>;

    /// Current message payload.
    fn message(&self) -> &str;

    /// Mutable message payload, rewritten by the post-processor.
    fn message_mut(&mut self) -> &mut String;

    /// Resolve a readable accessor for `property`, or `None` if the type has
    /// no such property.
    fn accessor(property: &str) -> Option<Accessor<Self>>
    where
        Self: Sized;
}

/// One audit occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    log_level: i32,
    occurrence: DateTime<Utc>,
    conversation_id: Option<String>,
    context: Option<String>,
    instance_id: Option<String>,
    correlation_id: Option<String>,
    transaction_id: Option<String>,
    message: String,
    message_type: Option<String>,
    sequence_id: Option<i64>,
}

impl AuditEvent {
    /// Property names readable through [`AuditRecord::accessor`].
    pub const PROPERTIES: [&'static str; 10] = [
        "log_level",
        "occurrence",
        "conversation_id",
        "context",
        "instance_id",
        "correlation_id",
        "transaction_id",
        "message_type",
        "message",
        "sequence_id",
    ];

    /// Create an event occurring now.
    pub fn new(log_level: i32, message: impl Into<String>) -> Self {
        Self {
            log_level,
            occurrence: Utc::now(),
            conversation_id: None,
            context: None,
            instance_id: None,
            correlation_id: None,
            transaction_id: None,
            message: message.into(),
            message_type: None,
            sequence_id: None,
        }
    }

    /// Set the occurrence timestamp.
    #[must_use]
    pub const fn with_occurrence(mut self, occurrence: DateTime<Utc>) -> Self {
        self.occurrence = occurrence;
        self
    }

    /// Set the conversation id.
    #[must_use]
    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    /// Set the context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the workflow instance id.
    #[must_use]
    pub fn with_instance_id(mut self, id: impl Into<String>) -> Self {
        self.instance_id = Some(id.into());
        self
    }

    /// Set the correlation id.
    #[must_use]
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Set the transaction id.
    #[must_use]
    pub fn with_transaction_id(mut self, id: impl Into<String>) -> Self {
        self.transaction_id = Some(id.into());
        self
    }

    /// Set the message type.
    #[must_use]
    pub fn with_message_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_type = Some(message_type.into());
        self
    }

    /// Pre-assign the identity value.
    #[must_use]
    pub const fn with_sequence_id(mut self, id: i64) -> Self {
        self.sequence_id = Some(id);
        self
    }

    /// Occurrence timestamp.
    #[must_use]
    pub const fn occurrence(&self) -> DateTime<Utc> {
        self.occurrence
    }

    /// Conversation id.
    #[must_use]
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Context.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Workflow instance id.
    #[must_use]
    pub fn instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref()
    }

    /// Correlation id.
    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Transaction id.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    /// Message type.
    #[must_use]
    pub fn message_type(&self) -> Option<&str> {
        self.message_type.as_deref()
    }
}

impl AuditRecord for AuditEvent {
    fn log_level(&self) -> i32 {
        self.log_level
    }

    fn sequence_id(&self) -> Option<i64> {
        self.sequence_id
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn message_mut(&mut self) -> &mut String {
        &mut self.message
    }

    fn accessor(property: &str) -> Option<Accessor<Self>> {
        let read: fn(&Self) -> SqlValue = match property {
            "log_level" => |e: &Self| e.log_level.into(),
            "occurrence" => |e: &Self| e.occurrence.into(),
            "conversation_id" => |e: &Self| e.conversation_id.clone().into(),
            "context" => |e: &Self| e.context.clone().into(),
            "instance_id" => |e: &Self| e.instance_id.clone().into(),
            "correlation_id" => |e: &Self| e.correlation_id.clone().into(),
            "transaction_id" => |e: &Self| e.transaction_id.clone().into(),
            "message_type" => |e: &Self| e.message_type.clone().into(),
            "message" => |e: &Self| e.message.clone().into(),
            "sequence_id" => |e: &Self| e.sequence_id.into(),
            _ => return None,
        };
        Some(Accessor::new(property, read))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_property_resolves() {
        for property in AuditEvent::PROPERTIES {
            let accessor = AuditEvent::accessor(property);
            assert!(accessor.is_some(), "{property} should resolve");
            assert_eq!(accessor.unwrap().property(), property);
        }
        assert!(AuditEvent::accessor("logLevel").is_none());
    }

    #[test]
    fn test_accessors_read_current_values() {
        let event = AuditEvent::new(3, "boom")
            .with_conversation_id("conv-1")
            .with_sequence_id(42);

        let read = |p: &str| AuditEvent::accessor(p).unwrap().read(&event);
        assert_eq!(read("log_level"), SqlValue::Int(3));
        assert_eq!(read("message"), SqlValue::Text("boom".into()));
        assert_eq!(read("conversation_id"), SqlValue::Text("conv-1".into()));
        assert_eq!(read("context"), SqlValue::Null);
        assert_eq!(read("sequence_id"), SqlValue::Int(42));
        assert_eq!(read("occurrence"), SqlValue::Timestamp(event.occurrence()));
    }

    #[test]
    fn test_message_is_mutable_in_place() {
        let mut event = AuditEvent::new(1, "raw");
        event.message_mut().push_str("-processed");
        assert_eq!(event.message(), "raw-processed");
    }
}
