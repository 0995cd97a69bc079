//! Counting completion barrier for one-way worker signaling.
//!
//! The barrier hands out exactly one [`CompletionPermit`] per expected
//! worker. Workers never read the count back; they only signal, and the
//! coordinator only waits. Built on a `watch` channel so waiters observe the
//! current count without any wakeup races.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

/// Counts outstanding workers and releases waiters once every permit has
/// signaled.
#[derive(Debug)]
pub struct CompletionBarrier {
    tx: watch::Sender<usize>,
    rx: watch::Receiver<usize>,
}

impl CompletionBarrier {
    /// Creates a barrier expecting `count` signals and hands out exactly
    /// `count` permits, one per worker.
    pub fn new(count: usize) -> (Arc<Self>, Vec<CompletionPermit>) {
        let (tx, rx) = watch::channel(count);
        let barrier = Arc::new(Self { tx, rx });
        let permits = (0..count)
            .map(|_| CompletionPermit {
                barrier: Arc::clone(&barrier),
                signaled: false,
            })
            .collect();
        (barrier, permits)
    }

    /// Waits until every permit has signaled.
    ///
    /// `wait_for` inspects the current value before suspending, so a barrier
    /// created with a count of zero returns without blocking.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|outstanding| *outstanding == 0).await;
    }

    /// Permits that have not signaled yet.
    pub fn outstanding(&self) -> usize {
        *self.rx.borrow()
    }

    fn signal(&self) {
        self.tx.send_modify(|outstanding| {
            debug_assert!(*outstanding > 0, "more signals than permits issued");
            *outstanding = outstanding.saturating_sub(1);
        });
    }
}

/// One-shot completion permit held by a single worker.
///
/// [`CompletionPermit::complete`] consumes the permit and signals the barrier
/// exactly once. A permit dropped without completing (a worker that panicked
/// or was aborted) signals from its drop guard instead, so a failed worker
/// can never leave the coordinator waiting.
#[derive(Debug)]
pub struct CompletionPermit {
    barrier: Arc<CompletionBarrier>,
    signaled: bool,
}

impl CompletionPermit {
    /// Signals completion on the success path.
    pub fn complete(mut self) {
        self.signaled = true;
        self.barrier.signal();
    }
}

impl Drop for CompletionPermit {
    fn drop(&mut self) {
        if !self.signaled {
            warn!("completion permit dropped without complete(), signaling barrier from drop guard");
            self.barrier.signal();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_zero_count_wait_returns_immediately() {
        let (barrier, permits) = CompletionBarrier::new(0);
        assert!(permits.is_empty());
        tokio::time::timeout(Duration::from_millis(100), barrier.wait())
            .await
            .expect("zero-count barrier must not block");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_wait_releases_after_exactly_n_signals() {
        let signals = Arc::new(AtomicUsize::new(0));
        let (barrier, permits) = CompletionBarrier::new(6);
        for permit in permits {
            let signals = Arc::clone(&signals);
            tokio::spawn(async move {
                signals.fetch_add(1, Ordering::SeqCst);
                permit.complete();
            });
        }
        barrier.wait().await;
        assert_eq!(signals.load(Ordering::SeqCst), 6);
        assert_eq!(barrier.outstanding(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_dropped_permit_still_signals() {
        let (barrier, mut permits) = CompletionBarrier::new(2);
        let abandoned = permits.pop().unwrap();
        let completed = permits.pop().unwrap();

        tokio::spawn(async move {
            completed.complete();
        });
        tokio::spawn(async move {
            let _abandoned = abandoned;
            panic!("worker blew up mid-loop");
        });

        tokio::time::timeout(Duration::from_secs(1), barrier.wait())
            .await
            .expect("drop guard must release the barrier");
    }
}
