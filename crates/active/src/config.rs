//! Worker configuration.

use std::time::Duration;

use crate::error::Error;

/// Interval at which every bounded wait re-checks its condition.
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(1000);

/// Default worker thread name.
pub const DEFAULT_NAME: &str = "active-object";

/// Configuration for an [`ActiveObject`](crate::ActiveObject) worker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActiveConfig {
    /// Name given to the worker thread.
    pub name: String,
    /// Worker stack size in bytes; the platform default when `None`.
    pub stack_size: Option<usize>,
    /// Re-check interval for parked workers, `wait_suspend` and `join`.
    pub idle_interval: Duration,
}

impl Default for ActiveConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            stack_size: None,
            idle_interval: DEFAULT_IDLE_INTERVAL,
        }
    }
}

impl ActiveConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ActiveConfigBuilder {
        ActiveConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty() {
            return Err(Error::InvalidConfig("worker name must not be empty"));
        }
        if self.name.contains('\0') {
            return Err(Error::InvalidConfig("worker name must not contain NUL"));
        }
        if self.idle_interval.is_zero() {
            return Err(Error::InvalidConfig("idle interval must be non-zero"));
        }
        if self.stack_size == Some(0) {
            return Err(Error::InvalidConfig("stack size must be non-zero"));
        }
        Ok(())
    }
}

/// Builder for ergonomic worker configuration.
#[derive(Debug, Clone, Default)]
pub struct ActiveConfigBuilder {
    config: ActiveConfig,
}

impl ActiveConfigBuilder {
    /// Sets the worker thread name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Sets the worker stack size in bytes.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    /// Sets the bounded re-check interval.
    pub fn idle_interval(mut self, interval: Duration) -> Self {
        self.config.idle_interval = interval;
        self
    }

    pub fn build(self) -> ActiveConfig {
        self.config
    }
}
