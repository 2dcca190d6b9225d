//! Batcher backed by dedicated OS threads.
//!
//! Commands are queued on a bounded crossbeam channel. Each worker blocks on
//! the channel, drains whatever else is already queued (up to the batch size)
//! and executes the batch inside one transaction on one connection.
//!
//! - **No polling**: workers block on `recv`; dropping the sender wakes them
//! - **Non-blocking submit**: a full queue rejects the command immediately
//! - **Drain on shutdown**: queued commands are flushed before workers exit

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::BatcherConfig;
use crate::core::{AuditError, BatchCommand, Batcher, DataSource, DbError};

/// Snapshot of batcher activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatcherStats {
    /// Batches executed, successful or not.
    pub batches_executed: u64,
    /// Commands reported as completed.
    pub commands_completed: u64,
    /// Commands reported as failed, including rejections.
    pub commands_failed: u64,
}

#[derive(Debug, Default)]
struct BatcherCounters {
    batches_executed: AtomicU64,
    commands_completed: AtomicU64,
    commands_failed: AtomicU64,
}

impl BatcherCounters {
    fn snapshot(&self) -> BatcherStats {
        BatcherStats {
            batches_executed: self.batches_executed.load(Ordering::Relaxed),
            commands_completed: self.commands_completed.load(Ordering::Relaxed),
            commands_failed: self.commands_failed.load(Ordering::Relaxed),
        }
    }
}

/// Thread-pool batching engine for [`BatchCommand`]s.
pub struct ThreadBatcher<C: BatchCommand> {
    config: BatcherConfig,
    /// Option allows shutdown by dropping the sender.
    tx: Mutex<Option<Sender<C>>>,
    counters: Arc<BatcherCounters>,
    shutdown: AtomicBool,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl<C: BatchCommand> ThreadBatcher<C> {
    /// Start `config.worker_count` flush threads writing through `data_source`.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Config` for an invalid configuration and
    /// `AuditError::Spawn` if a worker thread cannot be started.
    pub fn new(config: BatcherConfig, data_source: Arc<dyn DataSource>) -> Result<Self, AuditError> {
        config
            .validate()
            .map_err(|e| AuditError::Config(crate::core::ConfigError::Invalid(e)))?;

        let (tx, rx) = bounded::<C>(config.max_queue_depth);
        let counters = Arc::new(BatcherCounters::default());

        let mut workers = Vec::with_capacity(config.worker_count);
        for worker_id in 0..config.worker_count {
            let worker = Worker {
                id: worker_id,
                rx: rx.clone(),
                data_source: Arc::clone(&data_source),
                counters: Arc::clone(&counters),
                max_batch_size: config.max_batch_size,
            };
            let handle = thread::Builder::new()
                .name(format!("audit-batcher-{worker_id}"))
                .spawn(move || worker.run())
                .map_err(|e| AuditError::Spawn(e.to_string()))?;
            workers.push(handle);
        }

        info!(
            worker_count = config.worker_count,
            max_queue_depth = config.max_queue_depth,
            max_batch_size = config.max_batch_size,
            "audit batcher started"
        );

        Ok(Self {
            config,
            tx: Mutex::new(Some(tx)),
            counters,
            shutdown: AtomicBool::new(false),
            workers: Mutex::new(workers),
        })
    }

    /// Configuration the batcher was started with.
    #[must_use]
    pub const fn config(&self) -> &BatcherConfig {
        &self.config
    }

    /// Current activity counters.
    #[must_use]
    pub fn stats(&self) -> BatcherStats {
        self.counters.snapshot()
    }

    /// Stop accepting commands, flush everything queued, and join the workers.
    ///
    /// Safe to call from a command's outcome handler: the calling worker is
    /// not joined and exits on its own once the queue drains.
    pub fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("shutting down audit batcher");
        self.tx.lock().take();

        let current = thread::current().id();
        let mut workers = self.workers.lock();
        for (worker_id, worker) in workers.drain(..).enumerate() {
            if worker.thread().id() == current {
                debug!(worker_id, "shutdown requested from worker; not joining itself");
                continue;
            }
            if worker.join().is_err() {
                warn!(worker_id, "audit batcher worker panicked");
            }
        }
        info!("audit batcher shut down");
    }

    fn reject(&self, command: C, reason: &str) {
        self.counters.commands_failed.fetch_add(1, Ordering::Relaxed);
        command.failed(AuditError::Rejected(reason.to_owned()));
    }
}

impl<C: BatchCommand> Batcher<C> for ThreadBatcher<C> {
    fn submit(&self, command: C) {
        if self.shutdown.load(Ordering::Acquire) {
            self.reject(command, "batcher is shut down");
            return;
        }
        let guard = self.tx.lock();
        let Some(tx) = guard.as_ref() else {
            drop(guard);
            self.reject(command, "batcher is shut down");
            return;
        };
        match tx.try_send(command) {
            Ok(()) => {}
            Err(TrySendError::Full(command)) => {
                drop(guard);
                warn!(max_queue_depth = self.config.max_queue_depth, "audit batch queue is full");
                self.reject(command, "queue is full");
            }
            Err(TrySendError::Disconnected(command)) => {
                drop(guard);
                self.reject(command, "batcher is shut down");
            }
        }
    }
}

impl<C: BatchCommand> Drop for ThreadBatcher<C> {
    fn drop(&mut self) {
        // Workers are not joined here; they exit once the queue drains.
        if !self.shutdown.swap(true, Ordering::AcqRel) {
            self.tx.lock().take();
            debug!("audit batcher dropped without explicit shutdown");
        }
    }
}

struct Worker<C> {
    id: usize,
    rx: Receiver<C>,
    data_source: Arc<dyn DataSource>,
    counters: Arc<BatcherCounters>,
    max_batch_size: usize,
}

impl<C: BatchCommand> Worker<C> {
    fn run(self) {
        debug!(worker_id = self.id, "audit batcher worker started");
        // recv fails once the sender is dropped and the queue is empty.
        while let Ok(first) = self.rx.recv() {
            let mut batch = Vec::with_capacity(self.max_batch_size);
            batch.push(first);
            while batch.len() < self.max_batch_size {
                match self.rx.try_recv() {
                    Ok(command) => batch.push(command),
                    Err(_) => break,
                }
            }
            self.flush(batch);
        }
        debug!(worker_id = self.id, "audit batcher worker exiting");
    }

    fn flush(&self, batch: Vec<C>) {
        let size = batch.len();
        let outcome = self.execute(&batch);
        self.counters.batches_executed.fetch_add(1, Ordering::Relaxed);

        match outcome {
            Ok(()) => {
                debug!(worker_id = self.id, size, "audit batch committed");
                self.counters
                    .commands_completed
                    .fetch_add(size as u64, Ordering::Relaxed);
                batch.into_iter().for_each(C::completed);
            }
            Err(e) => {
                warn!(worker_id = self.id, size, error = %e, "audit batch failed");
                self.counters
                    .commands_failed
                    .fetch_add(size as u64, Ordering::Relaxed);
                for command in batch {
                    command.failed(AuditError::Persistence(e.clone()));
                }
            }
        }
    }

    fn execute(&self, batch: &[C]) -> Result<(), DbError> {
        let mut con = self.data_source.connection()?;
        con.begin()?;
        match C::execute_batch(batch, &mut *con) {
            Ok(()) => con.commit(),
            Err(e) => {
                if let Err(rollback) = con.rollback() {
                    warn!(worker_id = self.id, error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }
}
