use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::behavior::Lifecycle;
use crate::config::ActiveConfig;
use crate::context::Context;
use crate::error::LifecycleError;


pub(crate) const IDLE: Duration = Duration::from_millis(10);

pub(crate) fn fast_config(name: &str) -> ActiveConfig {
    ActiveConfig::builder().name(name).idle_interval(IDLE).build()
}

/// How a probe callback fails.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Fail {
    Exhaust,
    Fault,
    Panic,
}

impl Fail {
    fn raise(self, at: &str) -> LifecycleError {
        match self {
            Self::Exhaust => LifecycleError::exhausted(format!("{at} out of memory")),
            Self::Fault => LifecycleError::fault(format!("{at} broke")),
            Self::Panic => panic!("{at} panicked"),
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct Counters {
    pub init: Arc<AtomicUsize>,
    pub steps: Arc<AtomicUsize>,
    pub cleanup: Arc<AtomicUsize>,
}

impl Counters {
    pub fn snapshot(&self) -> (usize, usize, usize) {
        (
            self.init.load(Ordering::SeqCst),
            self.steps.load(Ordering::SeqCst),
            self.cleanup.load(Ordering::SeqCst),
        )
    }
}

/// Counts callback invocations and fails on demand.
#[derive(Default)]
pub(crate) struct Probe {
    pub counters: Counters,
    pub init_fail: Option<Fail>,
    pub step_fail: Option<(usize, Fail)>,
    pub finish_after: Option<usize>,
    pub cleanup_fail: Option<Fail>,
}

impl Probe {
    pub fn new(counters: &Counters) -> Self {
        Self {
            counters: counters.clone(),
            ..Self::default()
        }
    }
}

impl Lifecycle for Probe {
    fn init(&mut self, _ctx: &Context) -> Result<(), LifecycleError> {
        self.counters.init.fetch_add(1, Ordering::SeqCst);
        match self.init_fail {
            Some(fail) => Err(fail.raise("init")),
            None => Ok(()),
        }
    }

    fn step(&mut self, _ctx: &Context) -> Result<bool, LifecycleError> {
        let n = self.counters.steps.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((at, fail)) = self.step_fail {
            if n >= at {
                return Err(fail.raise("step"));
            }
        }
        Ok(self.finish_after.map_or(true, |limit| n < limit))
    }

    fn cleanup(&mut self, _ctx: &Context) -> Result<(), LifecycleError> {
        self.counters.cleanup.fetch_add(1, Ordering::SeqCst);
        match self.cleanup_fail {
            Some(fail) => Err(fail.raise("cleanup")),
            None => Ok(()),
        }
    }
}
