//! The completion gate: a reference count that keeps a run alive.
//!
//! Anything that still has work in flight raises an objection and drops it
//! once the work is finished. The run ends when the count returns to zero.
//! Raises and drops must be paired by the caller; an extra drop is reported
//! as [`HarnessError::ObjectionUnderflow`], a missing drop shows up as a hang
//! (or a watchdog expiry, if one is configured).

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Notify;

use crate::error::HarnessError;

/// Reference-counted "keep running" gate.
#[derive(Debug, Default)]
pub struct Objection {
    outstanding: AtomicUsize,
    raised_total: AtomicU64,
    released: Notify,
}

impl Objection {
    /// Creates a gate with no objections raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises one objection.
    pub fn raise(&self, origin: &str) {
        let now = self.outstanding.fetch_add(1, Ordering::AcqRel) + 1;
        self.raised_total.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(origin, outstanding = now, "objection raised");
    }

    /// Drops one objection, waking [`wait_all_dropped`](Self::wait_all_dropped)
    /// callers when the count reaches zero.
    pub fn drop_objection(&self, origin: &str) -> Result<(), HarnessError> {
        let prev = self
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .map_err(|_| HarnessError::ObjectionUnderflow)?;
        tracing::trace!(origin, outstanding = prev - 1, "objection dropped");
        if prev == 1 {
            self.released.notify_waiters();
        }
        Ok(())
    }

    /// Number of objections currently raised.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Number of objections raised over the gate's lifetime.
    pub fn raised_total(&self) -> u64 {
        self.raised_total.load(Ordering::Relaxed)
    }

    /// Waits until no objections are outstanding.
    ///
    /// Returns immediately if the count is already zero.
    pub async fn wait_all_dropped(&self) {
        loop {
            let notified = self.released.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn raise_and_drop_balance() {
        let gate = Objection::new();
        gate.raise("test");
        gate.raise("driver");
        assert_eq!(gate.outstanding(), 2);
        gate.drop_objection("driver").unwrap();
        gate.drop_objection("test").unwrap();
        assert_eq!(gate.outstanding(), 0);
        assert_eq!(gate.raised_total(), 2);
    }

    #[test]
    fn underflow_is_an_error() {
        let gate = Objection::new();
        let err = gate.drop_objection("monitor").unwrap_err();
        assert!(matches!(err, HarnessError::ObjectionUnderflow));
        assert_eq!(gate.outstanding(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_returns_immediately_when_clear() {
        Objection::new().wait_all_dropped().await;
    }

    #[tokio::test(start_paused = true)]
    async fn wait_blocks_until_last_drop() {
        let gate = Arc::new(Objection::new());
        gate.raise("a");
        gate.raise("b");

        let dropper = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                gate.drop_objection("a").unwrap();
                tokio::time::sleep(Duration::from_millis(5)).await;
                gate.drop_objection("b").unwrap();
            })
        };

        let start = tokio::time::Instant::now();
        gate.wait_all_dropped().await;
        assert!(start.elapsed() >= Duration::from_millis(10));
        assert_eq!(gate.outstanding(), 0);
        dropper.await.unwrap();
    }
}
