//! Tests for message post-processors

use batching_audit_trail::core::{
    FnPostProcessor, IdentityPostProcessor, MessagePostProcessor, TruncatingPostProcessor,
};

#[test]
fn test_identity_keeps_message() {
    let message = "payload {\"id\": 7}".to_string();
    assert_eq!(IdentityPostProcessor.serialize(message.clone()), message);
}

#[test]
fn test_closure_post_processor() {
    let redact = FnPostProcessor(|m: String| m.replace("secret", "******"));
    assert_eq!(redact.serialize("token=secret".into()), "token=******");
}

#[test]
fn test_truncation() {
    let truncate = TruncatingPostProcessor::new(5);
    assert_eq!(truncate.serialize("abcdefgh".into()), "abcde");
    assert_eq!(truncate.serialize("abc".into()), "abc");
    assert_eq!(truncate.serialize("äöüßéèà".into()), "äöüßé");
}

#[test]
fn test_post_processor_as_trait_object() {
    let processors: Vec<Box<dyn MessagePostProcessor>> = vec![
        Box::new(IdentityPostProcessor),
        Box::new(FnPostProcessor(|m: String| format!("[{m}]"))),
        Box::new(TruncatingPostProcessor::new(2)),
    ];
    let out = processors
        .iter()
        .fold("hello".to_string(), |m, p| p.serialize(m));
    assert_eq!(out, "[h");
}
