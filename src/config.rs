//! Runtime configuration: time-slice budget and yield threshold.

use std::time::Duration;

/// Errors from [`RuntimeConfig::validate`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("slice budget must be non-zero")]
    ZeroSliceBudget,
    #[error("yield threshold {threshold:?} must be smaller than the slice budget {budget:?}")]
    ThresholdExceedsBudget {
        threshold: Duration,
        budget: Duration,
    },
}

// ---------------------------------------------------------------------------
// RuntimeConfig
// ---------------------------------------------------------------------------

/// Scheduling parameters for a reconciler and its idle host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Wall-clock budget granted to one work-loop slice.
    pub slice_budget: Duration,
    /// The work loop yields once the deadline reports less than this.
    pub yield_threshold: Duration,
    /// Pause between slices, standing in for the host's idle period.
    pub idle_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            slice_budget: Duration::from_millis(50),
            yield_threshold: Duration::from_millis(1),
            idle_interval: Duration::from_millis(1),
        }
    }
}

impl RuntimeConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slice budget (builder).
    pub fn with_slice_budget(mut self, budget: Duration) -> Self {
        self.slice_budget = budget;
        self
    }

    /// Set the yield threshold (builder).
    pub fn with_yield_threshold(mut self, threshold: Duration) -> Self {
        self.yield_threshold = threshold;
        self
    }

    /// Set the idle interval between slices (builder).
    pub fn with_idle_interval(mut self, interval: Duration) -> Self {
        self.idle_interval = interval;
        self
    }

    /// Check that a slice can ever make progress.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slice_budget.is_zero() {
            return Err(ConfigError::ZeroSliceBudget);
        }
        if self.yield_threshold >= self.slice_budget {
            return Err(ConfigError::ThresholdExceedsBudget {
                threshold: self.yield_threshold,
                budget: self.slice_budget,
            });
        }
        Ok(())
    }
}
