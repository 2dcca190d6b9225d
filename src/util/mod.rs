//! Utility helpers.

pub mod telemetry;

pub use telemetry::*;
