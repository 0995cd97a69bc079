//! Shared ordered container with an internal exclusive lock.
//!
//! `SyncSequence` is the one object workers share for mutation. The lock is
//! private to this module and every mutation goes through [`SyncSequence::append`],
//! so the locking discipline cannot be bypassed by reaching into the container.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Mutex;

/// Ordered sequence of integers guarded by an exclusive lock.
///
/// The final order of elements reflects the order in which `append` calls
/// acquired the lock; nothing ties it to worker identity or dispatch order.
/// Lives for one coordinated run and is dropped with it.
#[derive(Debug, Default)]
pub struct SyncSequence {
    values: Mutex<Vec<i64>>,
    // Writers currently inside the critical section, and the highest count
    // ever observed. Backs the serialization assertions in tests.
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl SyncSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the tail while holding the lock.
    ///
    /// Suspends only while the lock is contended. An unrecoverable lock state
    /// is not representable as an error here; it panics the holder.
    pub async fn append(&self, value: i64) {
        let mut values = self.values.lock().await;
        let writers = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_in_flight.fetch_max(writers, Ordering::AcqRel);
        values.push(value);
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }

    /// Number of elements appended so far.
    pub async fn len(&self) -> usize {
        self.values.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Copies the current contents out under the lock.
    pub async fn snapshot(&self) -> Vec<i64> {
        self.values.lock().await.clone()
    }

    /// Highest number of writers ever observed inside the critical section.
    ///
    /// Stays at 1 under any concurrent load when mutation is properly
    /// serialized (0 for a sequence that was never appended to).
    pub fn peak_writers(&self) -> usize {
        self.peak_in_flight.load(Ordering::Acquire)
    }
}
