//! Simulation and execution configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Validated simulation parameters. Immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationConfig {
    num_trials: usize,
    num_assets: usize,
    confidence_level: f64,
    seed: Option<u64>,
}

impl SimulationConfig {
    /// Validate and build a configuration.
    ///
    /// Fails with [`SimulationError::Config`] when either count is zero or
    /// `confidence_level` is not strictly inside `(0, 1)`.
    pub fn new(num_trials: usize, num_assets: usize, confidence_level: f64) -> Result<Self> {
        if num_trials == 0 {
            return Err(SimulationError::config("num_trials must be positive"));
        }
        if num_assets == 0 {
            return Err(SimulationError::config("num_assets must be positive"));
        }
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(SimulationError::config(format!(
                "confidence_level must be in (0, 1), got {confidence_level}"
            )));
        }

        Ok(Self {
            num_trials,
            num_assets,
            confidence_level,
            seed: None,
        })
    }

    /// Use a master seed so runs can be replayed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of Monte Carlo trials.
    #[must_use]
    pub const fn num_trials(&self) -> usize {
        self.num_trials
    }

    /// Number of assets in the portfolio.
    #[must_use]
    pub const fn num_assets(&self) -> usize {
        self.num_assets
    }

    /// Confidence level for VaR (e.g. 0.95).
    #[must_use]
    pub const fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Master seed, if any.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Worker pool tuning for the data-parallel strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExecutionConfig {
    /// Worker count for the data-parallel pool (0 = hardware concurrency).
    #[serde(default)]
    pub max_threads: usize,
}
