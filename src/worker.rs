//! Worker: one unit of concurrent execution.
//!
//! Each worker owns its random-number generator. Drawing from a shared,
//! process-wide generator would reintroduce hidden shared state next to the
//! one lock this crate is about, so the generator is per-worker and may be
//! seeded explicitly for reproducible runs.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::barrier::CompletionPermit;
use crate::sequence::SyncSequence;

/// Lifecycle of a single worker. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Created,
    Running,
    Done,
}

/// What a worker reports after its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummary {
    pub worker_id: usize,
    /// Appends actually performed; less than the configured count only when
    /// the run was cancelled mid-loop.
    pub appends_performed: usize,
    pub state: WorkerState,
}

/// Performs a fixed batch of appends of uniformly drawn random values
/// against a shared [`SyncSequence`], then signals its completion permit
/// exactly once.
pub struct Worker {
    id: usize,
    appends: usize,
    value_bound: i64,
    rng: fastrand::Rng,
    state: WorkerState,
}

impl Worker {
    /// `value_bound` is the exclusive upper end of the `[0, value_bound)`
    /// draw range. Callers validate it is positive before dispatch.
    pub fn new(id: usize, appends: usize, value_bound: i64) -> Self {
        Self {
            id,
            appends,
            value_bound,
            rng: fastrand::Rng::new(),
            state: WorkerState::Created,
        }
    }

    /// Replaces the worker's private generator with a seeded one, for
    /// reproducing a run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Runs the append loop to completion, or stops early once `cancel_rx`
    /// flips to true.
    ///
    /// The loop is tight: no pause between iterations, the only suspension
    /// point is the sequence lock. The permit is consumed on every exit path;
    /// if an append panics, the permit's drop guard signals the barrier
    /// instead, so the coordinator still observes this worker.
    pub async fn run(
        mut self,
        sequence: Arc<SyncSequence>,
        permit: CompletionPermit,
        mut cancel_rx: watch::Receiver<bool>,
    ) -> WorkerSummary {
        self.state = WorkerState::Running;
        debug!(worker_id = self.id, appends = self.appends, "worker starting");

        let mut performed = 0;
        for _ in 0..self.appends {
            if *cancel_rx.borrow_and_update() {
                debug!(worker_id = self.id, performed, "worker observed cancel, stopping early");
                break;
            }
            let value = self.rng.i64(0..self.value_bound);
            sequence.append(value).await;
            performed += 1;
        }

        self.state = WorkerState::Done;
        permit.complete();
        debug!(worker_id = self.id, performed, "worker done");

        WorkerSummary {
            worker_id: self.id,
            appends_performed: performed,
            state: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barrier::CompletionBarrier;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_worker_performs_exact_batch() {
        let sequence = Arc::new(SyncSequence::new());
        let (barrier, mut permits) = CompletionBarrier::new(1);
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let worker = Worker::new(0, 25, 10).with_seed(42);
        assert_eq!(worker.state(), WorkerState::Created);

        let summary = worker
            .run(Arc::clone(&sequence), permits.pop().unwrap(), cancel_rx)
            .await;

        assert_eq!(summary.state, WorkerState::Done);
        assert_eq!(summary.appends_performed, 25);
        assert_eq!(sequence.len().await, 25);
        assert!(sequence.snapshot().await.iter().all(|v| (0..10).contains(v)));
        assert_eq!(barrier.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_worker_stops_on_cancel() {
        let sequence = Arc::new(SyncSequence::new());
        let (barrier, mut permits) = CompletionBarrier::new(1);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        cancel_tx.send(true).unwrap();

        let summary = Worker::new(1, 1000, 100)
            .run(Arc::clone(&sequence), permits.pop().unwrap(), cancel_rx)
            .await;

        // Cancelled before the first draw, but the permit still signaled.
        assert_eq!(summary.appends_performed, 0);
        assert_eq!(summary.state, WorkerState::Done);
        assert_eq!(sequence.len().await, 0);
        assert_eq!(barrier.outstanding(), 0);
    }
}
