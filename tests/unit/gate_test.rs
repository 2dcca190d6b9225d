//! Tests for the severity gate

use batching_audit_trail::core::SeverityGate;

#[test]
fn test_default_threshold() {
    let gate = SeverityGate::default();
    assert_eq!(gate.threshold(), 5);
    assert!(gate.enabled(5));
    assert!(!gate.enabled(6));
}

#[test]
fn test_levels_at_or_below_threshold_are_enabled() {
    let gate = SeverityGate::new(3);
    for level in [i32::MIN, -1, 0, 1, 2, 3] {
        assert!(gate.enabled(level), "level {level} should be enabled");
    }
    for level in [4, 10, i32::MAX] {
        assert!(!gate.enabled(level), "level {level} should be disabled");
    }
}

#[test]
fn test_threshold_can_change_at_runtime() {
    let gate = SeverityGate::new(1);
    assert!(!gate.enabled(2));
    gate.set_threshold(2);
    assert!(gate.enabled(2));
    assert_eq!(gate.threshold(), 2);
}
