//! # active-object
//!
//! A managed active object: one worker thread that runs a user-supplied
//! [`Lifecycle`] (`init`, repeated `step`, `cleanup`) and can be suspended,
//! resumed, stopped, interrupted and joined from any thread.
//!
//! ## Module Overview
//! - [`active`]   – The [`ActiveObject`] handle and the worker lifecycle.
//! - [`behavior`] – The [`Lifecycle`] callback trait and closure adapter.
//! - [`context`]  – The [`Context`] passed to callbacks.
//! - [`config`]   – Worker configuration and builder.
//! - [`error`]    – Construction and callback error types.
//! - [`state`]    – Lifecycle phase, exit reason and status snapshot.
//!
//! ```no_run
//! use active_object::{from_fn, ActiveObject};
//!
//! let worker = ActiveObject::spawn(from_fn(|_ctx| Ok(true)))?;
//! worker.wait_suspend();
//! assert!(worker.is_suspended());
//! worker.stop();
//! worker.resume();
//! worker.join();
//! # Ok::<(), active_object::Error>(())
//! ```

pub mod active;
pub mod behavior;
pub mod config;
pub mod context;
pub mod error;
pub mod state;
mod sync;

pub use active::ActiveObject;
pub use behavior::{from_fn, Lifecycle, StepFn};
pub use config::{ActiveConfig, ActiveConfigBuilder, DEFAULT_IDLE_INTERVAL};
pub use context::Context;
pub use error::{Error, Interrupted, LifecycleError};
pub use state::{Exit, Phase, Status};

#[cfg(test)]
mod tests;
