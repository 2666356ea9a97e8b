//! Engine facade used by the benchmark harness.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{Level, info, span};

use crate::error::{Result, SimulationError};
use crate::portfolio::{Portfolio, PortfolioGenerator};
use crate::random::SeedPlan;
use crate::var::{self, RiskSummary};

use super::config::{ExecutionConfig, SimulationConfig};
use super::executor::{DataParallel, ExecutionStrategy, Sequential, TaskParallel};
use super::strategy::Strategy;
use super::trial::{PORTFOLIO_STREAM, TrialEngine};

/// Statistics of one completed run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunStats {
    /// Strategy that produced the losses.
    pub strategy: Strategy,
    /// Trials simulated.
    pub num_trials: usize,
    /// Threads the strategy could use.
    pub concurrency: usize,
    /// Wall-clock time of the trial loop.
    pub elapsed: Duration,
}

/// Monte Carlo VaR engine.
///
/// Owns the portfolio (generated once at construction) and the loss
/// distribution of the most recent run.
#[derive(Debug)]
pub struct Engine {
    config: SimulationConfig,
    execution: ExecutionConfig,
    portfolio: Portfolio,
    data_parallel: Option<DataParallel>,
    task_parallel: TaskParallel,
    losses: Option<Vec<f64>>,
    last_run: Option<RunStats>,
}

impl Engine {
    /// Validate parameters and generate a random portfolio.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Config`] for non-positive counts or a
    /// confidence level outside `(0, 1)`.
    pub fn new(num_trials: usize, num_assets: usize, confidence_level: f64) -> Result<Self> {
        Self::from_config(SimulationConfig::new(
            num_trials,
            num_assets,
            confidence_level,
        )?)
    }

    /// Generate a random portfolio for a validated config.
    ///
    /// # Errors
    ///
    /// Returns an error if portfolio generation fails.
    pub fn from_config(config: SimulationConfig) -> Result<Self> {
        let mut rng = SeedPlan::from_seed(config.seed()).source(PORTFOLIO_STREAM);
        let portfolio = PortfolioGenerator::default().generate(config.num_assets(), &mut rng)?;
        Ok(Self::assemble(config, portfolio))
    }

    /// Build an engine around an explicit portfolio.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Config`] when the portfolio size differs
    /// from `config.num_assets()`.
    pub fn with_portfolio(config: SimulationConfig, portfolio: Portfolio) -> Result<Self> {
        if portfolio.len() != config.num_assets() {
            return Err(SimulationError::config(format!(
                "portfolio has {} assets, config expects {}",
                portfolio.len(),
                config.num_assets()
            )));
        }
        Ok(Self::assemble(config, portfolio))
    }

    fn assemble(config: SimulationConfig, portfolio: Portfolio) -> Self {
        Self {
            config,
            execution: ExecutionConfig::default(),
            portfolio,
            data_parallel: None,
            task_parallel: TaskParallel::default(),
            losses: None,
            last_run: None,
        }
    }

    /// Override worker pool tuning. Drops any pool already built.
    #[must_use]
    pub fn with_execution(mut self, execution: ExecutionConfig) -> Self {
        self.execution = execution;
        self.data_parallel = None;
        self
    }

    /// Simulate a fresh loss distribution with `strategy`.
    ///
    /// Replaces the losses of any previous run.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::ThreadPool`] if the worker pool cannot be
    /// built.
    pub fn run(&mut self, strategy: Strategy) -> Result<RunStats> {
        let executor: &dyn ExecutionStrategy = match strategy {
            Strategy::Sequential => &Sequential,
            Strategy::TaskParallel => &self.task_parallel,
            Strategy::DataParallel => match self.data_parallel {
                Some(ref pool) => pool,
                None => &*self
                    .data_parallel
                    .insert(DataParallel::new(self.execution.max_threads)?),
            },
        };

        let _span = span!(Level::DEBUG, "simulation_run", strategy = %strategy).entered();

        let trials = TrialEngine::new(&self.portfolio, SeedPlan::from_seed(self.config.seed()))?;
        let start = Instant::now();
        let losses = trials.run(self.config.num_trials(), executor);
        let elapsed = start.elapsed();

        let stats = RunStats {
            strategy,
            num_trials: losses.len(),
            concurrency: executor.concurrency(),
            elapsed,
        };

        info!(
            strategy = %strategy,
            trials = stats.num_trials,
            assets = self.portfolio.len(),
            threads = stats.concurrency,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Simulation run complete"
        );

        self.losses = Some(losses);
        self.last_run = Some(stats);
        Ok(stats)
    }

    /// VaR of the most recent run at the configured confidence level.
    pub fn value_at_risk(&self) -> Result<f64> {
        var::value_at_risk(self.losses()?, self.config.confidence_level())
    }

    /// VaR, expected shortfall and distribution statistics of the most
    /// recent run.
    pub fn risk_summary(&self) -> Result<RiskSummary> {
        var::analyze(self.losses()?, self.config.confidence_level())
    }

    /// Loss distribution of the most recent run.
    pub fn losses(&self) -> Result<&[f64]> {
        self.losses.as_deref().ok_or(SimulationError::NotRun)
    }

    /// Statistics of the most recent run.
    #[must_use]
    pub const fn last_run(&self) -> Option<&RunStats> {
        self.last_run.as_ref()
    }

    /// Simulation parameters.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The portfolio shared by every run.
    #[must_use]
    pub const fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }
}
