//! Awaitable outcomes for batched writes.

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::core::{AuditCallback, AuditError, AuditRecord, AuditTrail, BatchingAuditTrail};

/// Outcome of a tracked asynchronous write.
pub type Completion = oneshot::Receiver<Result<(), AuditError>>;

/// Callback that forwards the write outcome into a oneshot channel.
///
/// The first outcome wins; later calls are ignored.
#[derive(Debug)]
pub struct CompletionCallback {
    tx: Mutex<Option<oneshot::Sender<Result<(), AuditError>>>>,
}

impl CompletionCallback {
    fn send(&self, outcome: Result<(), AuditError>) {
        if let Some(tx) = self.tx.lock().take() {
            // The receiver may have been dropped; the outcome is then unobserved.
            let _ = tx.send(outcome);
        }
    }
}

impl AuditCallback for CompletionCallback {
    fn done(&self) {
        self.send(Ok(()));
    }

    fn error(&self, error: AuditError) {
        self.send(Err(error));
    }
}

/// Create a linked callback and receiver.
#[must_use]
pub fn completion_channel() -> (CompletionCallback, Completion) {
    let (tx, rx) = oneshot::channel();
    (
        CompletionCallback {
            tx: Mutex::new(Some(tx)),
        },
        rx,
    )
}

impl<E: AuditRecord> BatchingAuditTrail<E> {
    /// Queue `event` for batched writing and return a receiver for its outcome.
    ///
    /// Events below the threshold resolve to `Ok(())` immediately without
    /// reaching the batcher. Unlike [`AuditTrail::async_log`], this path
    /// always allocates the returned channel; only enabled events also
    /// allocate a callback.
    pub fn async_log_tracked(&self, event: E) -> Completion {
        if !self.is_enabled(event.log_level()) {
            let (tx, rx) = oneshot::channel();
            // rx is still held here, so the send cannot fail.
            let _ = tx.send(Ok(()));
            return rx;
        }
        let (callback, rx) = completion_channel();
        self.submit(event, Some(Box::new(callback)));
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_outcome_wins() {
        let (callback, rx) = completion_channel();
        callback.error(AuditError::Rejected("full".into()));
        callback.done();
        let outcome = rx.await.unwrap();
        assert!(matches!(outcome, Err(AuditError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_disabled_event_resolves_without_submitting() {
        use std::sync::Arc;

        use crate::builders::AuditTrailBuilder;
        use crate::core::{AuditEvent, Batcher, InsertCommand};
        use crate::infra::InMemoryDataSource;

        struct Unreachable;
        impl Batcher<InsertCommand<AuditEvent>> for Unreachable {
            fn submit(&self, _command: InsertCommand<AuditEvent>) {
                panic!("disabled events must not reach the batcher");
            }
        }

        let trail = AuditTrailBuilder::<AuditEvent>::new()
            .level(2)
            .data_source(Arc::new(InMemoryDataSource::generic()))
            .batcher(Arc::new(Unreachable))
            .build()
            .unwrap();

        let outcome = trail.async_log_tracked(AuditEvent::new(3, "noise")).await;
        assert!(matches!(outcome, Ok(Ok(()))));
        assert_eq!(trail.stats().async_submitted, 0);
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (callback, rx) = completion_channel();
        drop(rx);
        callback.done();
    }
}
