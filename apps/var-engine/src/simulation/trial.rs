//! Per-trial loss computation.
//!
//! `loss_i = -(sum_j weight_j * sample(return_j, volatility_j))`
//!
//! Trials share the read-only portfolio and write only their own slot.

use std::ops::Range;

use rand_distr::Normal;

use crate::error::{Result, SimulationError};
use crate::portfolio::Portfolio;
use crate::random::{RandomSource, SeedPlan};

use super::config::SimulationConfig;
use super::executor::ExecutionStrategy;

/// Stream id reserved for portfolio generation.
pub(crate) const PORTFOLIO_STREAM: u64 = u64::MAX;

/// Prepared trial loop over one portfolio.
#[derive(Debug)]
pub struct TrialEngine<'a> {
    weights: &'a [f64],
    returns: Vec<Normal<f64>>,
    seeds: SeedPlan,
}

impl<'a> TrialEngine<'a> {
    /// Validate the portfolio's return distributions and prepare the loop.
    pub fn new(portfolio: &'a Portfolio, seeds: SeedPlan) -> Result<Self> {
        Ok(Self {
            weights: portfolio.weights(),
            returns: portfolio.return_distributions()?,
            seeds,
        })
    }

    /// Loss of one trial.
    #[inline]
    pub fn trial_loss(&self, rng: &mut RandomSource) -> f64 {
        let mut portfolio_return = 0.0;
        for (weight, dist) in self.weights.iter().zip(&self.returns) {
            portfolio_return += weight * rng.draw(dist);
        }
        -portfolio_return
    }

    /// Fill `losses` with one loss per slot using `strategy`.
    ///
    /// Each range handed out by the strategy gets its own generator, keyed
    /// by the range's first trial index.
    pub fn run_into(&self, losses: &mut [f64], strategy: &dyn ExecutionStrategy) {
        let body = |range: Range<usize>, slots: &mut [f64]| {
            let mut rng = self.seeds.source(range.start as u64);
            for slot in slots.iter_mut() {
                *slot = self.trial_loss(&mut rng);
            }
        };
        strategy.distribute(losses, &body);
    }

    /// Run `num_trials` trials into a freshly allocated distribution.
    pub fn run(&self, num_trials: usize, strategy: &dyn ExecutionStrategy) -> Vec<f64> {
        // NaN marks a slot no trial has written yet.
        let mut losses = vec![f64::NAN; num_trials];
        self.run_into(&mut losses, strategy);
        losses
    }
}

/// Simulate the loss distribution for `portfolio` under `config`.
///
/// # Errors
///
/// Returns [`SimulationError::Config`] when the portfolio size does not
/// match `config.num_assets()`, or [`SimulationError::InvalidParameter`]
/// when a return distribution is malformed.
pub fn simulate_losses(
    portfolio: &Portfolio,
    config: &SimulationConfig,
    strategy: &dyn ExecutionStrategy,
) -> Result<Vec<f64>> {
    if portfolio.len() != config.num_assets() {
        return Err(SimulationError::config(format!(
            "portfolio has {} assets, config expects {}",
            portfolio.len(),
            config.num_assets()
        )));
    }

    let engine = TrialEngine::new(portfolio, SeedPlan::from_seed(config.seed()))?;
    Ok(engine.run(config.num_trials(), strategy))
}
