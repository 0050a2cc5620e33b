//! Handle given to lifecycle callbacks.

use core::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::active::Shared;
use crate::error::Interrupted;

/// Per-worker context passed to `init`, `step` and `cleanup`.
///
/// Lets the worker act as its own controller: it may request its own stop
/// or suspension (honored at the next checkpoint) and sleep in a way that
/// [`ActiveObject::interrupt`](crate::ActiveObject::interrupt) can cut short.
pub struct Context {
    shared: Arc<Shared>,
}

impl Context {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Name of the worker this context belongs to.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn stop(&self) {
        self.shared.request_stop();
    }

    /// Asks the worker to park at its next checkpoint.
    pub fn suspend(&self) {
        self.shared.request_suspend();
    }

    pub fn is_stop_requested(&self) -> bool {
        self.shared.monitor.lock().stop_requested
    }

    pub fn is_suspend_requested(&self) -> bool {
        self.shared.monitor.lock().suspend_requested
    }

    /// Number of `step` calls completed so far.
    pub fn steps(&self) -> u64 {
        self.shared.monitor.lock().steps
    }

    /// Sleeps for `duration` unless interrupted first.
    ///
    /// An interrupt that arrived before the call is consumed immediately.
    pub fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let mut state = self.shared.monitor.lock();
        self.shared
            .monitor
            .wait_while_for(&mut state, duration, duration, |s| !s.interrupt_pending);
        if state.take_interrupt() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }

    /// Consumes a pending interrupt without blocking.
    pub fn check_interrupt(&self) -> Result<(), Interrupted> {
        if self.shared.monitor.lock().take_interrupt() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("status", &self.shared.monitor.lock().status())
            .finish()
    }
}
