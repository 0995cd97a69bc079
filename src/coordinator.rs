//! Coordinator: dispatches workers and blocks until all have finished.
//!
//! The coordinator owns the run: it creates the shared [`SyncSequence`], a
//! [`CompletionBarrier`] counting the workers, spawns one task per worker,
//! and waits for the barrier to release. A cancel signal and an optional
//! wall-clock timeout are threaded through so a hung worker cannot wedge the
//! run forever.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::barrier::CompletionBarrier;
use crate::core::errors::{Result, StampedeError};
use crate::sequence::SyncSequence;
use crate::worker::Worker;

/// How long cancelled workers get to drain after a run timeout before the
/// coordinator reports without them.
const CANCEL_GRACE: Duration = Duration::from_millis(250);

/// Configuration for a single coordinated run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of workers to dispatch.
    pub worker_count: usize,
    /// Appends each worker performs.
    pub appends_per_worker: usize,
    /// Exclusive upper bound of the random draw range `[0, value_bound)`.
    pub value_bound: i64,
    /// Wall-clock cap on the whole run, in milliseconds. `None` waits
    /// indefinitely.
    pub timeout_ms: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            worker_count: 1,
            appends_per_worker: 100,
            value_bound: 100,
            timeout_ms: None,
        }
    }
}

impl RunConfig {
    /// Parses and validates a configuration from JSON.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.value_bound <= 0 {
            return Err(StampedeError::configuration_field(
                "value_bound must be positive",
                "value_bound",
            ));
        }
        if self.timeout_ms == Some(0) {
            return Err(StampedeError::configuration_field(
                "timeout_ms must be nonzero when set",
                "timeout_ms",
            ));
        }
        Ok(())
    }
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunReport {
    /// The sequence the workers filled. Kept behind its lock; use the safe
    /// accessors to inspect it.
    pub sequence: Arc<SyncSequence>,
    pub workers_dispatched: usize,
    /// Total appends observed after the barrier released.
    pub appends: usize,
}

/// Dispatches workers against one shared sequence and waits for all of them.
///
/// One coordinator per run: the cancel flag is sticky, like a fired cancel
/// channel, so a cancelled coordinator is not reused.
#[derive(Debug)]
pub struct Coordinator {
    cancel_tx: watch::Sender<bool>,
    cancel_rx: watch::Receiver<bool>,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        Self {
            cancel_tx,
            cancel_rx,
        }
    }

    /// Signals every worker of this run to stop early. Idempotent.
    pub fn cancel(&self) {
        // Receivers live as long as self, so the send cannot fail.
        let _ = self.cancel_tx.send(true);
    }

    /// Runs the full dispatch-and-wait cycle.
    ///
    /// Creates the shared sequence and a barrier counting
    /// `config.worker_count`, spawns that many workers, then blocks until
    /// every one has signaled. A `worker_count` of zero returns immediately
    /// without dispatching anything.
    #[instrument(skip_all, fields(workers = config.worker_count))]
    pub async fn run(&self, config: RunConfig) -> Result<RunReport> {
        config.validate()?;

        let sequence = Arc::new(SyncSequence::new());

        if config.worker_count == 0 {
            debug!("zero workers requested, nothing to dispatch");
            return Ok(RunReport {
                sequence,
                workers_dispatched: 0,
                appends: 0,
            });
        }

        let (barrier, permits) = CompletionBarrier::new(config.worker_count);
        for (id, permit) in permits.into_iter().enumerate() {
            let worker = Worker::new(id, config.appends_per_worker, config.value_bound);
            let sequence = Arc::clone(&sequence);
            let cancel_rx = self.cancel_rx.clone();
            tokio::spawn(async move {
                worker.run(sequence, permit, cancel_rx).await;
            });
        }
        debug!(workers = config.worker_count, "workers dispatched");

        match config.timeout_ms {
            Some(timeout_ms) => {
                let deadline = Duration::from_millis(timeout_ms);
                if tokio::time::timeout(deadline, barrier.wait()).await.is_err() {
                    warn!(timeout_ms, "run timed out, cancelling workers");
                    self.cancel();
                    // Cancelled workers check the flag every iteration; give
                    // them a moment to signal before reporting.
                    let _ = tokio::time::timeout(CANCEL_GRACE, barrier.wait()).await;
                    return Err(StampedeError::timeout("coordinated run", timeout_ms));
                }
            }
            None => barrier.wait().await,
        }

        if *self.cancel_rx.borrow() {
            info!("run cancelled, all workers signaled");
            return Err(StampedeError::cancelled("coordinated run"));
        }

        let appends = sequence.len().await;
        info!(appends, workers = config.worker_count, "run complete");
        Ok(RunReport {
            sequence,
            workers_dispatched: config.worker_count,
            appends,
        })
    }
}
