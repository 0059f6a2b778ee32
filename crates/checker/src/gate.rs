//! Counting admission control for fare lookups.
//!
//! Backed by a tokio [`Semaphore`], whose waiters are served in FIFO order,
//! so every acquire eventually succeeds once a slot frees.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Error)]
#[error("concurrency gate closed")]
pub struct GateClosed;

/// Bounds how many lookups run at once across the whole batch.
///
/// Cloning shares the same slots.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// One admitted slot. Dropping it (or calling [`release`](GatePermit::release)) returns the slot.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl GatePermit {
    pub fn release(self) {}
}

impl ConcurrencyGate {
    /// A gate admitting at most `capacity` holders; zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait until fewer than `capacity` permits are held, then take one.
    pub async fn acquire(&self) -> Result<GatePermit, GateClosed> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| GateClosed)?;
        Ok(GatePermit { _permit: permit })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently held.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn zero_capacity_is_raised() {
        assert_eq!(ConcurrencyGate::new(0).capacity(), 1);
    }

    #[tokio::test]
    async fn permits_are_returned_on_release() {
        let gate = ConcurrencyGate::new(2);
        let a = gate.acquire().await.unwrap();
        let b = gate.acquire().await.unwrap();
        assert_eq!(gate.in_flight(), 2);
        a.release();
        assert_eq!(gate.in_flight(), 1);
        drop(b);
        assert_eq!(gate.in_flight(), 0);
    }

    #[tokio::test]
    async fn acquire_waits_for_a_free_slot() {
        let gate = ConcurrencyGate::new(1);
        let held = gate.acquire().await.unwrap();

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move {
                let _permit = gate.acquire().await.unwrap();
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        held.release();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be admitted")
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_exceeds_capacity() {
        for capacity in [1, 3, 8] {
            let gate = ConcurrencyGate::new(capacity);
            let current = Arc::new(AtomicUsize::new(0));
            let peak = Arc::new(AtomicUsize::new(0));

            let handles: Vec<_> = (0..40)
                .map(|_| {
                    let gate = gate.clone();
                    let current = current.clone();
                    let peak = peak.clone();
                    tokio::spawn(async move {
                        let _permit = gate.acquire().await.unwrap();
                        let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(2)).await;
                        current.fetch_sub(1, Ordering::SeqCst);
                    })
                })
                .collect();

            for handle in handles {
                handle.await.unwrap();
            }
            assert!(peak.load(Ordering::SeqCst) <= capacity);
            assert_eq!(gate.in_flight(), 0);
        }
    }
}
