//! Lock and condition variable pair shared by a worker and its controllers.
//!
//! Every wait is bounded: waiters wake at least once per interval and
//! re-evaluate their predicate, so a missed notification costs at most one
//! interval instead of blocking forever.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

/// Mutex-protected value with an associated condition variable.
pub(crate) struct Monitor<T> {
    value: Mutex<T>,
    cond: Condvar,
}

impl<T> Monitor<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
            cond: Condvar::new(),
        }
    }

    /// Acquires the lock. Never poisoned: a panicking holder simply releases it.
    pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
        self.value.lock()
    }

    pub(crate) fn notify_all(&self) {
        self.cond.notify_all();
    }

    /// Blocks while `condition` holds, re-checking at least every `interval`.
    pub(crate) fn wait_while<F>(
        &self,
        guard: &mut MutexGuard<'_, T>,
        interval: Duration,
        mut condition: F,
    ) where
        F: FnMut(&mut T) -> bool,
    {
        while condition(&mut **guard) {
            let _ = self.cond.wait_for(guard, interval);
        }
    }

    /// Like [`wait_while`](Self::wait_while) but gives up once `timeout` has
    /// elapsed. Returns `true` if the condition cleared in time.
    pub(crate) fn wait_while_for<F>(
        &self,
        guard: &mut MutexGuard<'_, T>,
        interval: Duration,
        timeout: Duration,
        mut condition: F,
    ) -> bool
    where
        F: FnMut(&mut T) -> bool,
    {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait_while(guard, interval, condition);
            return true;
        };

        while condition(&mut **guard) {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let slice = interval.min(deadline - now);
            let _ = self.cond.wait_for(guard, slice);
        }
        true
    }
}
