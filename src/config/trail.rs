//! Audit trail configuration structures.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::mapping::is_valid_identifier;
use crate::core::{default_mapping, with_additional, AppResult, ColumnMapping, SeverityGate, DEFAULT_TABLE};

/// Retry policy for the default transaction runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Audit trail configuration, fixed once the trail is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditTrailConfig {
    /// Target table.
    pub table: String,
    /// Severity threshold; events above it are ignored.
    pub level: i32,
    /// Property-to-column mapping, in column order.
    pub mapping: Vec<ColumnMapping>,
    /// Entries prepended to `mapping`.
    pub additional_mapping: Vec<ColumnMapping>,
    /// Retry policy for the default transaction runner.
    pub retry: RetryConfig,
}

impl Default for AuditTrailConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_owned(),
            level: SeverityGate::DEFAULT_THRESHOLD,
            mapping: default_mapping(),
            additional_mapping: Vec::new(),
            retry: RetryConfig::default(),
        }
    }
}

impl AuditTrailConfig {
    /// Mapping actually bound: `additional_mapping` followed by `mapping`.
    #[must_use]
    pub fn effective_mapping(&self) -> Vec<ColumnMapping> {
        with_additional(&self.additional_mapping, &self.mapping)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_identifier(&self.table) {
            return Err(format!("table `{}` is not a valid identifier", self.table));
        }
        for entry in self.additional_mapping.iter().chain(&self.mapping) {
            if entry.property.is_empty() {
                return Err(format!("column `{}` has an empty property name", entry.column));
            }
            if !is_valid_identifier(&entry.column) {
                return Err(format!(
                    "column `{}` for property `{}` is not a valid identifier",
                    entry.column, entry.property
                ));
            }
        }
        if self.retry.max_attempts == 0 {
            return Err("retry.max_attempts must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load overrides from the environment (and a `.env` file if present).
    ///
    /// Reads `AUDIT_TRAIL_TABLE`, `AUDIT_TRAIL_LEVEL` and
    /// `AUDIT_TRAIL_RETRY_ATTEMPTS`; unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or the result
    /// fails validation.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        let mut cfg = Self::default();

        if let Ok(table) = std::env::var("AUDIT_TRAIL_TABLE") {
            cfg.table = table;
        }
        if let Ok(level) = std::env::var("AUDIT_TRAIL_LEVEL") {
            cfg.level = level
                .trim()
                .parse()
                .with_context(|| format!("AUDIT_TRAIL_LEVEL is not an integer: {level}"))?;
        }
        if let Ok(attempts) = std::env::var("AUDIT_TRAIL_RETRY_ATTEMPTS") {
            cfg.retry.max_attempts = attempts.trim().parse().with_context(|| {
                format!("AUDIT_TRAIL_RETRY_ATTEMPTS is not a positive integer: {attempts}")
            })?;
        }

        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}
