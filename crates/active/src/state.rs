//! Worker state shared between the worker thread and its controllers.

/// Where the worker currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Phase {
    /// Thread created, lifecycle body not entered yet.
    Starting,
    /// Running `init`.
    Initializing,
    /// Inside the step loop (at a checkpoint or in `step`).
    Running,
    /// Parked at the suspend checkpoint.
    Suspended,
    /// Running `cleanup`.
    CleaningUp,
    /// The worker thread has finished.
    Terminated,
}

/// How a worker ended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Exit {
    /// `step` returned `false`.
    Finished,
    /// A stop request was observed at a checkpoint.
    Stopped,
    /// `init` or `step` reported resource exhaustion.
    Exhausted,
    /// A callback failed with a non-recoverable error.
    Faulted(String),
    /// A callback panicked.
    Panicked,
}

impl Exit {
    /// Returns `true` if `cleanup` ran for this exit.
    ///
    /// A fault raised by `cleanup` itself also reports `false`.
    pub fn ran_cleanup(&self) -> bool {
        matches!(self, Self::Finished | Self::Stopped | Self::Exhausted)
    }
}

/// Consistent snapshot of a worker's control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Status {
    pub phase: Phase,
    pub suspend_requested: bool,
    pub suspended: bool,
    pub stop_requested: bool,
    pub alive: bool,
    pub steps: u64,
}

/// The guarded record. Only ever read or written under the monitor lock.
#[derive(Debug)]
pub(crate) struct State {
    pub(crate) started: bool,
    pub(crate) suspend_requested: bool,
    pub(crate) suspended: bool,
    /// Monotonic: set once, never cleared.
    pub(crate) stop_requested: bool,
    pub(crate) interrupt_pending: bool,
    pub(crate) alive: bool,
    pub(crate) phase: Phase,
    pub(crate) steps: u64,
    pub(crate) exit: Option<Exit>,
}

impl State {
    pub(crate) fn new() -> Self {
        Self {
            started: false,
            suspend_requested: false,
            suspended: false,
            stop_requested: false,
            interrupt_pending: false,
            alive: true,
            phase: Phase::Starting,
            steps: 0,
            exit: None,
        }
    }

    pub(crate) fn status(&self) -> Status {
        Status {
            phase: self.phase,
            suspend_requested: self.suspend_requested,
            suspended: self.suspended,
            stop_requested: self.stop_requested,
            alive: self.alive,
            steps: self.steps,
        }
    }

    /// Consumes a pending interrupt, returning whether one was pending.
    pub(crate) fn take_interrupt(&mut self) -> bool {
        std::mem::replace(&mut self.interrupt_pending, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_alive_and_idle() {
        let status = State::new().status();
        assert_eq!(status.phase, Phase::Starting);
        assert!(status.alive);
        assert!(!status.suspended);
        assert!(!status.suspend_requested);
        assert!(!status.stop_requested);
        assert_eq!(status.steps, 0);
    }

    #[test]
    fn take_interrupt_consumes_once() {
        let mut state = State::new();
        state.interrupt_pending = true;
        assert!(state.take_interrupt());
        assert!(!state.take_interrupt());
    }

    #[test]
    fn exit_cleanup_classification() {
        assert!(Exit::Finished.ran_cleanup());
        assert!(Exit::Stopped.ran_cleanup());
        assert!(Exit::Exhausted.ran_cleanup());
        assert!(!Exit::Panicked.ran_cleanup());
        assert!(!Exit::Faulted("boom".into()).ran_cleanup());
    }
}
