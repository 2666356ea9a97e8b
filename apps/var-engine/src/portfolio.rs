//! Portfolio model and random portfolio generation.
//!
//! A [`Portfolio`] holds three index-aligned sequences (weights, expected
//! returns, volatilities). It is built once, validated once, and shared
//! read-only by every trial afterwards.

use rand_distr::Normal;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SimulationError};
use crate::random::{self, RandomSource};

/// Allowed deviation of the weight sum from 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Weight sums at or below this magnitude are treated as zero.
const MIN_WEIGHT_SUM: f64 = 1e-12;

/// Normalise `weights` in place so they sum to 1.
///
/// Fails with [`SimulationError::DegenerateInput`] when the raw sum is zero,
/// near zero or not finite (this includes the empty slice).
pub fn normalize_weights(weights: &mut [f64]) -> Result<()> {
    let sum: f64 = weights.iter().sum();
    if !sum.is_finite() || sum.abs() <= MIN_WEIGHT_SUM {
        return Err(SimulationError::DegenerateInput { weight_sum: sum });
    }
    for weight in weights.iter_mut() {
        *weight /= sum;
    }
    Ok(())
}

/// Index-aligned portfolio data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    weights: Vec<f64>,
    expected_returns: Vec<f64>,
    volatilities: Vec<f64>,
}

impl Portfolio {
    /// Build a portfolio from explicit per-asset data.
    ///
    /// The three sequences must have the same non-zero length, contain only
    /// finite values, have non-negative volatilities, and weights must sum
    /// to 1 within [`WEIGHT_SUM_TOLERANCE`].
    pub fn new(
        weights: Vec<f64>,
        expected_returns: Vec<f64>,
        volatilities: Vec<f64>,
    ) -> Result<Self> {
        let n = weights.len();
        if expected_returns.len() != n || volatilities.len() != n {
            return Err(SimulationError::invalid_parameter(format!(
                "portfolio sequences must be index-aligned: {} weights, {} returns, {} volatilities",
                n,
                expected_returns.len(),
                volatilities.len()
            )));
        }

        let weight_sum: f64 = weights.iter().sum();
        if n == 0 || !weight_sum.is_finite() || weight_sum.abs() <= MIN_WEIGHT_SUM {
            return Err(SimulationError::DegenerateInput { weight_sum });
        }

        if let Some(j) = (0..n).find(|&j| {
            !(weights[j].is_finite() && expected_returns[j].is_finite() && volatilities[j].is_finite())
        }) {
            return Err(SimulationError::invalid_parameter(format!(
                "asset {j} has a non-finite entry"
            )));
        }

        if let Some(j) = volatilities.iter().position(|v| *v < 0.0) {
            return Err(SimulationError::invalid_parameter(format!(
                "asset {j} has negative volatility {}",
                volatilities[j]
            )));
        }

        if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SimulationError::invalid_parameter(format!(
                "weights must sum to 1, got {weight_sum}"
            )));
        }

        Ok(Self {
            weights,
            expected_returns,
            volatilities,
        })
    }

    /// Number of assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false for a constructed portfolio.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Normalised weights.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Expected return per asset.
    #[must_use]
    pub fn expected_returns(&self) -> &[f64] {
        &self.expected_returns
    }

    /// Volatility per asset.
    #[must_use]
    pub fn volatilities(&self) -> &[f64] {
        &self.volatilities
    }

    /// Per-asset return distributions, validated up front so the trial
    /// loop never has to handle a bad parameter.
    pub(crate) fn return_distributions(&self) -> Result<Vec<Normal<f64>>> {
        self.expected_returns
            .iter()
            .zip(&self.volatilities)
            .map(|(&mean, &stddev)| random::normal(mean, stddev))
            .collect()
    }
}

/// Draws random portfolios.
///
/// Per asset: `weight ~ Uniform(0, 1)`, `return ~ Normal(return_mean,
/// return_stddev)`, `volatility ~ Normal(volatility_mean,
/// volatility_stddev)` folded at zero (a negative draw contributes its
/// magnitude). Weights are normalised afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioGenerator {
    /// Mean of the expected-return draw.
    pub return_mean: f64,
    /// Standard deviation of the expected-return draw.
    pub return_stddev: f64,
    /// Mean of the volatility draw.
    pub volatility_mean: f64,
    /// Standard deviation of the volatility draw.
    pub volatility_stddev: f64,
}

impl Default for PortfolioGenerator {
    fn default() -> Self {
        Self {
            return_mean: 0.05,
            return_stddev: 0.02,
            volatility_mean: 0.1,
            volatility_stddev: 0.05,
        }
    }
}

impl PortfolioGenerator {
    /// Generate a portfolio of `num_assets` assets.
    ///
    /// `num_assets == 0` leaves nothing to normalise and fails with
    /// [`SimulationError::DegenerateInput`].
    pub fn generate(&self, num_assets: usize, rng: &mut RandomSource) -> Result<Portfolio> {
        let return_dist = random::normal(self.return_mean, self.return_stddev)?;
        let volatility_dist = random::normal(self.volatility_mean, self.volatility_stddev)?;

        let mut weights = Vec::with_capacity(num_assets);
        let mut expected_returns = Vec::with_capacity(num_assets);
        let mut volatilities = Vec::with_capacity(num_assets);

        for _ in 0..num_assets {
            weights.push(rng.uniform());
            expected_returns.push(rng.draw(&return_dist));
            volatilities.push(rng.draw(&volatility_dist).abs());
        }

        normalize_weights(&mut weights)?;

        debug!(num_assets, "Generated random portfolio");

        Portfolio::new(weights, expected_returns, volatilities)
    }
}
