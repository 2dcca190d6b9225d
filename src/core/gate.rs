//! Severity gate checked before any audit work is done.

use std::sync::atomic::{AtomicI32, Ordering};

/// Numeric threshold: a level is enabled when it is at most the threshold.
#[derive(Debug)]
pub struct SeverityGate {
    threshold: AtomicI32,
}

impl SeverityGate {
    /// Threshold used when none is configured.
    pub const DEFAULT_THRESHOLD: i32 = 5;

    /// Create a gate with `threshold`.
    #[must_use]
    pub const fn new(threshold: i32) -> Self {
        Self {
            threshold: AtomicI32::new(threshold),
        }
    }

    /// Whether events at `level` should be processed.
    #[inline]
    #[must_use]
    pub fn enabled(&self, level: i32) -> bool {
        level <= self.threshold.load(Ordering::Relaxed)
    }

    /// Current threshold.
    #[must_use]
    pub fn threshold(&self) -> i32 {
        self.threshold.load(Ordering::Relaxed)
    }

    /// Change the threshold at runtime.
    pub fn set_threshold(&self, threshold: i32) {
        self.threshold.store(threshold, Ordering::Relaxed);
    }
}

impl Default for SeverityGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}
