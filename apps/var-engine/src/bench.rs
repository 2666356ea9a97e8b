//! Strategy comparison harness.
//!
//! Times each execution strategy on the same engine (same portfolio) and
//! derives speedup and efficiency against the sequential baseline:
//!
//! - speedup = sequential runtime / strategy runtime
//! - efficiency = speedup / threads available to the strategy

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::simulation::{Engine, ExecutionConfig, SimulationConfig, Strategy};

/// Run `f` and return its output with the wall-clock time it took.
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

/// Timing and VaR of one strategy.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyTiming {
    /// Strategy measured.
    pub strategy: Strategy,
    /// VaR produced by the run.
    pub var: f64,
    /// Runtime in milliseconds.
    pub runtime_ms: f64,
    /// Threads the strategy could use.
    pub concurrency: usize,
}

/// All strategies measured at one trial count.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    /// Trials per run.
    pub num_trials: usize,
    /// Assets in the portfolio.
    pub num_assets: usize,
    /// Confidence level for VaR.
    pub confidence_level: f64,
    /// One entry per strategy, in run order.
    pub timings: Vec<StrategyTiming>,
}

impl Comparison {
    /// Timing for `strategy`, if it was measured.
    #[must_use]
    pub fn timing(&self, strategy: Strategy) -> Option<&StrategyTiming> {
        self.timings.iter().find(|t| t.strategy == strategy)
    }

    /// Sequential runtime divided by `strategy`'s runtime.
    ///
    /// `None` without a sequential baseline or with a zero runtime.
    #[must_use]
    pub fn speedup(&self, strategy: Strategy) -> Option<f64> {
        let baseline = self.timing(Strategy::Sequential)?;
        let timing = self.timing(strategy)?;
        if timing.runtime_ms > 0.0 {
            Some(baseline.runtime_ms / timing.runtime_ms)
        } else {
            None
        }
    }

    /// Speedup per available thread.
    #[must_use]
    pub fn efficiency(&self, strategy: Strategy) -> Option<f64> {
        let concurrency = self.timing(strategy)?.concurrency;
        if concurrency == 0 {
            return None;
        }
        self.speedup(strategy).map(|s| s / concurrency as f64)
    }
}

/// Run every strategy in `strategies` on `engine` and time it.
pub fn compare_strategies(engine: &mut Engine, strategies: &[Strategy]) -> Result<Comparison> {
    let mut timings = Vec::with_capacity(strategies.len());

    for &strategy in strategies {
        let (stats, elapsed) = measure(|| engine.run(strategy));
        let stats = stats?;
        let var = engine.value_at_risk()?;

        timings.push(StrategyTiming {
            strategy,
            var,
            runtime_ms: elapsed.as_secs_f64() * 1000.0,
            concurrency: stats.concurrency,
        });
    }

    let config = engine.config();
    Ok(Comparison {
        num_trials: config.num_trials(),
        num_assets: config.num_assets(),
        confidence_level: config.confidence_level(),
        timings,
    })
}

/// Inputs for a trial-count sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPlan {
    /// Trial counts to sweep.
    pub trial_sizes: Vec<usize>,
    /// Assets per portfolio.
    pub num_assets: usize,
    /// Confidence level for VaR.
    pub confidence_level: f64,
    /// Master seed (None = fresh entropy).
    pub seed: Option<u64>,
    /// Worker pool tuning.
    pub execution: ExecutionConfig,
    /// Strategies to compare, in run order.
    pub strategies: Vec<Strategy>,
}

/// Comparisons across a trial-count sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// When the sweep finished.
    pub generated_at: DateTime<Utc>,
    /// One comparison per trial count.
    pub comparisons: Vec<Comparison>,
}

/// Build an engine for each trial count and compare strategies on it.
pub fn sweep(plan: &SweepPlan) -> Result<SweepReport> {
    let mut comparisons = Vec::with_capacity(plan.trial_sizes.len());

    for &num_trials in &plan.trial_sizes {
        let mut config =
            match SimulationConfig::new(num_trials, plan.num_assets, plan.confidence_level) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        num_trials,
                        num_assets = plan.num_assets,
                        confidence_level = plan.confidence_level,
                        error = %e,
                        "Rejected sweep entry"
                    );
                    return Err(e);
                }
            };
        if let Some(seed) = plan.seed {
            config = config.with_seed(seed);
        }

        let mut engine = Engine::from_config(config)?.with_execution(plan.execution);
        let comparison = compare_strategies(&mut engine, &plan.strategies)?;

        info!(
            trials = num_trials,
            strategies = comparison.timings.len(),
            "Strategy comparison complete"
        );
        comparisons.push(comparison);
    }

    Ok(SweepReport {
        generated_at: Utc::now(),
        comparisons,
    })
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-----------------------------------")?;
        writeln!(f, "Number of Trials: {}", self.num_trials)?;

        for t in &self.timings {
            writeln!(f, "{} Simulation Results:", t.strategy)?;
            writeln!(f, "  Value-at-Risk (VaR): {}", t.var)?;
            writeln!(f, "  Runtime: {:.0} ms", t.runtime_ms)?;
            writeln!(f)?;
        }

        let parallel: Vec<&StrategyTiming> = self
            .timings
            .iter()
            .filter(|t| t.strategy != Strategy::Sequential)
            .collect();

        writeln!(f, "Performance Comparison:")?;
        writeln!(f, "  Runtime:")?;
        for t in &self.timings {
            writeln!(f, "    {} Runtime: {:.0} ms", t.strategy, t.runtime_ms)?;
        }
        writeln!(f, "  Speedup:")?;
        for t in &parallel {
            match self.speedup(t.strategy) {
                Some(s) => writeln!(f, "    {} Speedup: {s:.2}x", t.strategy)?,
                None => writeln!(f, "    {} Speedup: n/a", t.strategy)?,
            }
        }
        writeln!(f, "  Efficiency:")?;
        for t in &parallel {
            match self.efficiency(t.strategy) {
                Some(e) => writeln!(f, "    {}: {:.1}%", t.strategy, e * 100.0)?,
                None => writeln!(f, "    {}: n/a", t.strategy)?,
            }
        }
        writeln!(f, "-----------------------------------")
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Monte Carlo Simulation for Portfolio Risk Analysis")?;
        if let Some(first) = self.comparisons.first() {
            writeln!(f, "Number of Assets: {}", first.num_assets)?;
            writeln!(f, "Confidence Level: {}%", first.confidence_level * 100.0)?;
        }
        writeln!(f)?;
        for comparison in &self.comparisons {
            writeln!(f, "{comparison}")?;
        }
        Ok(())
    }
}
