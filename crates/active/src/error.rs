//! Error types.

use std::collections::TryReserveError;
use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Errors returned when creating an [`ActiveObject`](crate::ActiveObject).
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Failure reported by a lifecycle callback.
///
/// `Exhausted` is recoverable: the step loop ends and `cleanup` still runs.
/// `Fault` is not: the worker terminates without calling `cleanup`.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("resource exhausted: {0}")]
    Exhausted(String),
    #[error("fault: {0}")]
    Fault(Box<dyn StdError + Send + Sync + 'static>),
}

impl LifecycleError {
    pub fn exhausted(reason: impl Into<String>) -> Self {
        Self::Exhausted(reason.into())
    }

    /// Wraps any error (or message) as a non-recoverable fault.
    pub fn fault<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self::Fault(err.into())
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }
}

impl From<TryReserveError> for LifecycleError {
    fn from(err: TryReserveError) -> Self {
        Self::Exhausted(err.to_string())
    }
}

/// Returned by [`Context::sleep`](crate::Context::sleep) when the worker
/// was interrupted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("worker interrupted")]
pub struct Interrupted;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_reserve_failure_is_recoverable() {
        let mut buf: Vec<u8> = Vec::new();
        let err = buf.try_reserve(usize::MAX).unwrap_err();
        let err = LifecycleError::from(err);
        assert!(err.is_recoverable());
    }

    #[test]
    fn faults_are_not_recoverable() {
        let err = LifecycleError::fault("index out of range");
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "fault: index out of range");

        let io = io::Error::new(io::ErrorKind::Other, "disk gone");
        assert!(!LifecycleError::fault(io).is_recoverable());
    }

    #[test]
    fn exhausted_display() {
        let err = LifecycleError::exhausted("pool empty");
        assert_eq!(err.to_string(), "resource exhausted: pool empty");
    }
}
