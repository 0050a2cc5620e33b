//! Managed active object.
//!
//! An [`ActiveObject`] owns exactly one worker thread, created together with
//! the object, that drives a [`Lifecycle`] through `init`, zero or more
//! `step` calls and `cleanup`. Controllers steer it with cooperative
//! requests that the worker honors at its checkpoint, the point between two
//! `step` calls:
//!
//! - a stop request ends the step loop;
//! - a suspend request parks the worker until [`ActiveObject::resume`].
//!
//! While parked the worker waits on the suspend request alone. A stop issued
//! during suspension therefore only takes effect after a matching `resume`.
//!
//! All control state lives in one record behind one lock. The lock is held
//! for flag reads and writes only, never across a callback, so any thread
//! (including the worker itself) may call the control surface.

use core::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle, Thread, ThreadId};
use std::time::Duration;

use log::{debug, error, trace, warn};
use parking_lot::Mutex;

use crate::behavior::Lifecycle;
use crate::config::ActiveConfig;
use crate::context::Context;
use crate::error::{Error, LifecycleError};
use crate::state::{Exit, Phase, State, Status};
use crate::sync::Monitor;

/// State shared between the worker thread and every controller.
pub(crate) struct Shared {
    pub(crate) monitor: Monitor<State>,
    pub(crate) name: String,
    pub(crate) idle_interval: Duration,
}

impl Shared {
    pub(crate) fn new(name: impl Into<String>, idle_interval: Duration) -> Self {
        Self {
            monitor: Monitor::new(State::new()),
            name: name.into(),
            idle_interval,
        }
    }

    pub(crate) fn request_stop(&self) {
        let mut state = self.monitor.lock();
        if !state.stop_requested {
            state.stop_requested = true;
            debug!("stop requested for worker {:?}", self.name);
        }
    }

    pub(crate) fn request_suspend(&self) {
        let mut state = self.monitor.lock();
        if !state.suspend_requested {
            state.suspend_requested = true;
            debug!("suspend requested for worker {:?}", self.name);
        }
    }
}

/// Handle to a worker thread running a [`Lifecycle`].
///
/// Dropping the handle detaches the worker; it keeps running until its
/// lifecycle ends on its own.
pub struct ActiveObject {
    shared: Arc<Shared>,
    worker: Thread,
    /// Taken by the first `join` that observes termination.
    handle: Mutex<Option<JoinHandle<()>>>,
    config: ActiveConfig,
}

impl ActiveObject {
    /// Starts `behavior` on a new worker with the default configuration.
    pub fn spawn<B: Lifecycle>(behavior: B) -> Result<Self, Error> {
        Self::with_config(ActiveConfig::default(), behavior)
    }

    /// Starts `behavior` on a new worker configured by `config`.
    ///
    /// Fails only if the configuration is invalid or the operating system
    /// refuses to create the thread.
    pub fn with_config<B: Lifecycle>(config: ActiveConfig, behavior: B) -> Result<Self, Error> {
        config.validate()?;

        let shared = Arc::new(Shared::new(config.name.clone(), config.idle_interval));
        let mut builder = thread::Builder::new().name(config.name.clone());
        if let Some(size) = config.stack_size {
            builder = builder.stack_size(size);
        }

        let worker_shared = Arc::clone(&shared);
        let handle = builder.spawn(move || {
            let mut termination = Termination::new(Arc::clone(&worker_shared));
            let ctx = Context::new(Arc::clone(&worker_shared));
            let mut behavior = behavior;
            let exit = match run_lifecycle(&worker_shared, &mut behavior, &ctx) {
                Ok(exit) => exit,
                Err(err) => {
                    error!("worker {:?} terminated by fault: {err}", worker_shared.name);
                    Some(Exit::Faulted(err.to_string()))
                }
            };
            termination.exit = exit;
        })?;

        let worker = handle.thread().clone();
        debug!("spawned worker {:?} ({:?})", config.name, worker.id());

        Ok(Self {
            shared,
            worker,
            handle: Mutex::new(Some(handle)),
            config,
        })
    }

    /// Requests suspension at the next checkpoint. Returns immediately.
    pub fn suspend(&self) {
        self.shared.request_suspend();
    }

    /// Requests suspension and blocks until the worker has parked or terminated.
    ///
    /// Must not be called from the worker itself: it cannot park while
    /// waiting for itself.
    pub fn wait_suspend(&self) {
        let mut state = self.shared.monitor.lock();
        state.suspend_requested = true;
        self.shared
            .monitor
            .wait_while(&mut state, self.shared.idle_interval, |s| !s.suspended && s.alive);
    }

    /// Withdraws the suspend request and wakes a parked worker.
    pub fn resume(&self) {
        let mut state = self.shared.monitor.lock();
        state.suspend_requested = false;
        if state.suspended && state.alive {
            debug!("resuming worker {:?}", self.config.name);
            self.shared.monitor.notify_all();
        }
    }

    /// Requests termination at the next checkpoint. Returns immediately.
    ///
    /// Not honored while the worker is parked; pair with [`resume`](Self::resume).
    pub fn stop(&self) {
        self.shared.request_stop();
    }

    /// Wakes the worker out of its current wait without changing any
    /// control flag. A no-op once the worker has terminated.
    ///
    /// The interrupt is consumed by the worker's next cooperative yield,
    /// its suspend wait, or [`Context::sleep`].
    pub fn interrupt(&self) {
        let mut state = self.shared.monitor.lock();
        if !state.alive {
            trace!("interrupt dropped: worker {:?} terminated", self.config.name);
            return;
        }
        state.interrupt_pending = true;
        self.shared.monitor.notify_all();
    }

    /// Blocks until the worker has terminated and its OS thread has exited.
    ///
    /// Must not be called from the worker itself.
    pub fn join(&self) {
        {
            let mut state = self.shared.monitor.lock();
            self.shared
                .monitor
                .wait_while(&mut state, self.shared.idle_interval, |s| s.alive);
        }
        self.reap();
    }

    /// Blocks until the worker has terminated or `timeout` elapses.
    /// Returns `true` if the worker terminated, in which case its OS thread
    /// has also exited.
    pub fn join_timeout(&self, timeout: Duration) -> bool {
        let terminated = {
            let mut state = self.shared.monitor.lock();
            self.shared
                .monitor
                .wait_while_for(&mut state, self.shared.idle_interval, timeout, |s| s.alive)
        };
        if terminated {
            self.reap();
        }
        terminated
    }

    /// Waits for the already terminated thread to finish exiting.
    fn reap(&self) {
        let mut handle = self.handle.lock();
        if let Some(handle) = handle.take() {
            if handle.join().is_err() {
                trace!("reaped panicked worker {:?}", self.config.name);
            }
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.shared.monitor.lock().suspended
    }

    pub fn is_alive(&self) -> bool {
        self.shared.monitor.lock().alive
    }

    pub fn is_stop_requested(&self) -> bool {
        self.shared.monitor.lock().stop_requested
    }

    /// Number of `step` calls completed so far.
    pub fn steps(&self) -> u64 {
        self.shared.monitor.lock().steps
    }

    pub fn status(&self) -> Status {
        self.shared.monitor.lock().status()
    }

    /// How the worker ended, or `None` while it is still alive.
    pub fn exit(&self) -> Option<Exit> {
        self.shared.monitor.lock().exit.clone()
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn thread_id(&self) -> ThreadId {
        self.worker.id()
    }

    pub fn config(&self) -> &ActiveConfig {
        &self.config
    }
}

impl fmt::Debug for ActiveObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveObject")
            .field("name", &self.config.name)
            .field("thread", &self.worker.id())
            .field("status", &self.status())
            .finish()
    }
}

/// Publishes worker termination when dropped, including during unwinding.
struct Termination {
    shared: Arc<Shared>,
    exit: Option<Exit>,
}

impl Termination {
    fn new(shared: Arc<Shared>) -> Self {
        Self { shared, exit: None }
    }
}

impl Drop for Termination {
    fn drop(&mut self) {
        let exit = if thread::panicking() {
            error!("worker {:?} panicked; cleanup skipped", self.shared.name);
            Some(Exit::Panicked)
        } else {
            self.exit.take()
        };

        let mut state = self.shared.monitor.lock();
        state.alive = false;
        state.suspended = false;
        state.phase = Phase::Terminated;
        if exit.is_some() {
            debug!("worker {:?} terminated: {exit:?}", self.shared.name);
            state.exit = exit;
        }
        self.shared.monitor.notify_all();
    }
}

/// What the worker does after a checkpoint.
enum Checkpoint {
    Step,
    Resumed,
    Stop,
}

/// Runs the full lifecycle once. Returns `Ok(None)` if it already ran.
///
/// A non-recoverable error from `init` or `step` is returned without
/// running `cleanup`.
pub(crate) fn run_lifecycle<B: Lifecycle + ?Sized>(
    shared: &Shared,
    behavior: &mut B,
    ctx: &Context,
) -> Result<Option<Exit>, LifecycleError> {
    {
        let mut state = shared.monitor.lock();
        if state.started {
            trace!("lifecycle already started; ignoring re-entry");
            return Ok(None);
        }
        state.started = true;
        state.phase = Phase::Initializing;
    }

    let exit = match behavior.init(ctx) {
        Ok(()) => run_steps(shared, behavior, ctx)?,
        Err(err) if err.is_recoverable() => {
            warn!("worker {:?} init gave up: {err}", shared.name);
            Exit::Exhausted
        }
        Err(err) => return Err(err),
    };

    shared.monitor.lock().phase = Phase::CleaningUp;
    match behavior.cleanup(ctx) {
        Ok(()) => {}
        Err(err) if err.is_recoverable() => warn!("worker {:?} cleanup gave up: {err}", shared.name),
        Err(err) => return Err(err),
    }

    Ok(Some(exit))
}

fn run_steps<B: Lifecycle + ?Sized>(
    shared: &Shared,
    behavior: &mut B,
    ctx: &Context,
) -> Result<Exit, LifecycleError> {
    loop {
        match checkpoint(shared) {
            Checkpoint::Stop => return Ok(Exit::Stopped),
            Checkpoint::Resumed => continue,
            Checkpoint::Step => thread::yield_now(),
        }

        match behavior.step(ctx) {
            Ok(again) => {
                shared.monitor.lock().steps += 1;
                if !again {
                    return Ok(Exit::Finished);
                }
            }
            Err(err) if err.is_recoverable() => {
                warn!("worker {:?} step gave up: {err}", shared.name);
                return Ok(Exit::Exhausted);
            }
            Err(err) => return Err(err),
        }
    }
}

fn checkpoint(shared: &Shared) -> Checkpoint {
    let mut state = shared.monitor.lock();
    if state.stop_requested {
        return Checkpoint::Stop;
    }

    if !state.suspend_requested {
        // Cooperative yield: swallows any pending interrupt.
        state.take_interrupt();
        state.phase = Phase::Running;
        return Checkpoint::Step;
    }

    state.suspended = true;
    state.phase = Phase::Suspended;
    shared.monitor.notify_all();
    trace!("worker {:?} parked", shared.name);

    // Stop is deliberately not part of this condition.
    shared.monitor.wait_while(&mut state, shared.idle_interval, |s| {
        s.take_interrupt();
        s.suspend_requested
    });

    state.suspended = false;
    state.phase = Phase::Running;
    trace!("worker {:?} unparked", shared.name);
    Checkpoint::Resumed
}
