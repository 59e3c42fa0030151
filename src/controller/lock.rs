//! # Single-flight lock.
//!
//! [`SequenceLock`] is a compare-and-swap flag guarding
//! [`Controller::run`](crate::Controller::run). Acquisition never waits: a
//! caller either takes the flag or learns immediately that it is held.
//!
//! ## Invariants
//! - Among concurrent `try_lock` callers, exactly one observes "acquired".
//! - `unlock` on a free lock is a no-op returning `false`.
//! - [`LockGuard`] releases on drop, covering every exit path of a run.

use std::sync::atomic::{AtomicBool, Ordering};

/// Non-blocking binary lock.
#[derive(Debug, Default)]
pub struct SequenceLock {
    held: AtomicBool,
}

impl SequenceLock {
    pub const fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    /// Attempts to take the lock.
    ///
    /// Returns `true` if the lock was **already held** (the caller did not get
    /// it) and `false` if the caller just acquired it.
    pub fn try_lock(&self) -> bool {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
    }

    /// Releases the lock. Returns whether it was held.
    pub fn unlock(&self) -> bool {
        self.held
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_locked(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Takes the lock and returns a guard releasing it on drop.
    pub fn acquire(&self) -> Option<LockGuard<'_>> {
        if self.try_lock() {
            None
        } else {
            Some(LockGuard { lock: self })
        }
    }
}

/// Releases the [`SequenceLock`] it was acquired from when dropped.
#[derive(Debug)]
pub struct LockGuard<'a> {
    lock: &'a SequenceLock,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn try_lock_reports_already_held() {
        let lock = SequenceLock::new();
        assert!(!lock.try_lock());
        assert!(lock.try_lock());
        assert!(lock.unlock());
        assert!(!lock.try_lock());
    }

    #[test]
    fn redundant_unlock_is_harmless() {
        let lock = SequenceLock::new();
        assert!(!lock.unlock());
        assert!(!lock.unlock());
        assert!(!lock.is_locked());
        assert!(!lock.try_lock());
        assert!(lock.is_locked());
    }

    #[test]
    fn guard_releases_on_drop() {
        let lock = SequenceLock::new();
        {
            let _guard = lock.acquire().unwrap();
            assert!(lock.is_locked());
            assert!(lock.acquire().is_none());
        }
        assert!(!lock.is_locked());
    }

    #[test]
    fn exactly_one_concurrent_caller_acquires() {
        let lock = Arc::new(SequenceLock::new());
        let acquired = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(std::sync::Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let lock = Arc::clone(&lock);
                let acquired = Arc::clone(&acquired);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    if !lock.try_lock() {
                        acquired.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(acquired.load(Ordering::SeqCst), 1);
    }
}
