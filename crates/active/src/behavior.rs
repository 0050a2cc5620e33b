//! User-supplied lifecycle callbacks.

use core::fmt;

use crate::context::Context;
use crate::error::LifecycleError;

/// Work driven by an [`ActiveObject`](crate::ActiveObject) worker.
///
/// The worker calls `init` once, then `step` until it returns `Ok(false)`,
/// fails, or a stop request is observed, then `cleanup` once. No lock is
/// held while a callback runs, so callbacks may block freely.
pub trait Lifecycle: Send + 'static {
    fn init(&mut self, _ctx: &Context) -> Result<(), LifecycleError> {
        Ok(())
    }

    /// Performs one unit of work. `Ok(true)` asks to be called again.
    fn step(&mut self, ctx: &Context) -> Result<bool, LifecycleError>;

    fn cleanup(&mut self, _ctx: &Context) -> Result<(), LifecycleError> {
        Ok(())
    }
}

impl<B: Lifecycle + ?Sized> Lifecycle for Box<B> {
    fn init(&mut self, ctx: &Context) -> Result<(), LifecycleError> {
        (**self).init(ctx)
    }

    fn step(&mut self, ctx: &Context) -> Result<bool, LifecycleError> {
        (**self).step(ctx)
    }

    fn cleanup(&mut self, ctx: &Context) -> Result<(), LifecycleError> {
        (**self).cleanup(ctx)
    }
}

/// Behavior built from a step closure; see [`from_fn`].
pub struct StepFn<F> {
    step: F,
}

/// Wraps a step closure as a [`Lifecycle`] with no-op `init` and `cleanup`.
pub fn from_fn<F>(step: F) -> StepFn<F>
where
    F: FnMut(&Context) -> Result<bool, LifecycleError> + Send + 'static,
{
    StepFn { step }
}

impl<F> Lifecycle for StepFn<F>
where
    F: FnMut(&Context) -> Result<bool, LifecycleError> + Send + 'static,
{
    fn step(&mut self, ctx: &Context) -> Result<bool, LifecycleError> {
        (self.step)(ctx)
    }
}

impl<F> fmt::Debug for StepFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepFn").finish_non_exhaustive()
    }
}
