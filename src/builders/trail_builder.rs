//! Builder that wires configuration and collaborators into a running trail.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::config::AuditTrailConfig;
use crate::core::{
    AuditError, AuditRecord, BatchingAuditTrail, Batcher, ColumnMapping, ConfigError, DataSource,
    Dialect, IdentityPostProcessor, InsertCommand, MessagePostProcessor, StatementBuilder,
    TransactionRunner,
};
use crate::infra::RetryingTransaction;

/// Collects configuration and collaborators, then starts a [`BatchingAuditTrail`].
///
/// Starting probes the datasource once for its dialect and binds the mapping
/// against `E`; any failure there aborts startup.
pub struct AuditTrailBuilder<E: AuditRecord> {
    config: AuditTrailConfig,
    post_processor: Arc<dyn MessagePostProcessor>,
    data_source: Option<Arc<dyn DataSource>>,
    batcher: Option<Arc<dyn Batcher<InsertCommand<E>>>>,
    transactions: Option<Arc<dyn TransactionRunner>>,
}

impl<E: AuditRecord> Default for AuditTrailBuilder<E> {
    fn default() -> Self {
        Self::from_config(AuditTrailConfig::default())
    }
}

impl<E: AuditRecord> AuditTrailBuilder<E> {
    /// Builder with default table, level, and mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded from a loaded configuration.
    #[must_use]
    pub fn from_config(config: AuditTrailConfig) -> Self {
        Self {
            config,
            post_processor: Arc::new(IdentityPostProcessor),
            data_source: None,
            batcher: None,
            transactions: None,
        }
    }

    /// Target table.
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.config.table = table.into();
        self
    }

    /// Severity threshold.
    #[must_use]
    pub fn level(mut self, level: i32) -> Self {
        self.config.level = level;
        self
    }

    /// Replace the whole mapping.
    #[must_use]
    pub fn mapping(mut self, mapping: Vec<ColumnMapping>) -> Self {
        self.config.mapping = mapping;
        self
    }

    /// Entries placed in front of the current mapping.
    #[must_use]
    pub fn additional_mapping(mut self, additional: Vec<ColumnMapping>) -> Self {
        self.config.additional_mapping = additional;
        self
    }

    /// Message post-processor; defaults to the identity.
    #[must_use]
    pub fn post_processor(mut self, post_processor: Arc<dyn MessagePostProcessor>) -> Self {
        self.post_processor = post_processor;
        self
    }

    /// Datasource used for dialect detection and the default transaction runner.
    #[must_use]
    pub fn data_source(mut self, data_source: Arc<dyn DataSource>) -> Self {
        self.data_source = Some(data_source);
        self
    }

    /// Batching engine for the asynchronous path.
    #[must_use]
    pub fn batcher(mut self, batcher: Arc<dyn Batcher<InsertCommand<E>>>) -> Self {
        self.batcher = Some(batcher);
        self
    }

    /// Transaction runner for the synchronous path. Defaults to a
    /// [`RetryingTransaction`] over the datasource.
    #[must_use]
    pub fn transaction_runner(mut self, transactions: Arc<dyn TransactionRunner>) -> Self {
        self.transactions = Some(transactions);
        self
    }

    /// Configuration collected so far.
    #[must_use]
    pub const fn config(&self) -> &AuditTrailConfig {
        &self.config
    }

    /// Detect the dialect, bind the mapping, and start the trail.
    ///
    /// # Errors
    ///
    /// - `AuditError::Config` for invalid settings or an unreadable mapped property
    /// - `AuditError::NotConfigured` when no datasource was supplied
    /// - `AuditError::DialectDetection` when the datasource cannot be probed
    pub fn build(self) -> Result<BatchingAuditTrail<E>, AuditError> {
        info!(table = %self.config.table, level = self.config.level, "starting audit trail");
        self.config.validate().map_err(ConfigError::Invalid)?;

        let data_source = self
            .data_source
            .ok_or(AuditError::NotConfigured("data source"))?;
        let dialect = Dialect::detect(&*data_source).map_err(AuditError::DialectDetection)?;

        let mapping = self.config.effective_mapping();
        let schema = StatementBuilder::new(&self.config.table, &mapping).build::<E>(dialect)?;
        info!(sql = %schema.sql(), ?dialect, "audit trail statement bound");

        let transactions = self.transactions.unwrap_or_else(|| {
            Arc::new(RetryingTransaction::new(
                Arc::clone(&data_source),
                &self.config.retry,
            ))
        });
        if self.batcher.is_none() {
            info!("no batcher configured; asynchronous logging will fail");
        }

        Ok(BatchingAuditTrail::from_parts(
            self.config.level,
            schema,
            self.post_processor,
            self.batcher,
            transactions,
        ))
    }
}

impl<E: AuditRecord> fmt::Debug for AuditTrailBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditTrailBuilder")
            .field("config", &self.config)
            .field("has_data_source", &self.data_source.is_some())
            .field("has_batcher", &self.batcher.is_some())
            .field("has_transaction_runner", &self.transactions.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AuditEvent;
    use crate::infra::InMemoryDataSource;

    #[test]
    fn test_build_requires_data_source() {
        let err = AuditTrailBuilder::<AuditEvent>::new().build().unwrap_err();
        assert!(matches!(err, AuditError::NotConfigured("data source")));
    }

    #[test]
    fn test_additional_mapping_is_prepended() {
        let trail = AuditTrailBuilder::<AuditEvent>::new()
            .table("T")
            .mapping(vec![ColumnMapping::new("message", "MSG")])
            .additional_mapping(vec![ColumnMapping::new("context", "CTX")])
            .data_source(Arc::new(InMemoryDataSource::generic()))
            .build()
            .unwrap();
        assert_eq!(trail.sql(), "INSERT INTO T (CTX,MSG) VALUES (?,?)");
    }

    #[test]
    fn test_invalid_config_is_rejected_before_probing() {
        let ds = InMemoryDataSource::generic();
        let err = AuditTrailBuilder::<AuditEvent>::new()
            .table("")
            .data_source(Arc::new(ds.clone()))
            .build()
            .unwrap_err();
        assert!(matches!(err, AuditError::Config(ConfigError::Invalid(_))));
        assert_eq!(ds.connections_opened(), 0);
    }
}
