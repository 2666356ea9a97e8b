//! Per-worker random number generation.
//!
//! A [`RandomSource`] is an explicitly owned generator. Every worker or task
//! constructs its own and threads it through the trial body by `&mut`, so the
//! borrow checker rules out two workers drawing from one stream. There is no
//! thread-local or process-wide generator.
//!
//! Seeding follows a [`SeedPlan`]: either fresh OS-backed entropy for every
//! source, or a master seed mixed with a stream id so a run can be replayed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::{Result, SimulationError};

/// Weyl increment used to spread stream ids across the seed space.
const STREAM_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Build a normal distribution after validating its parameters.
///
/// Rejects non-finite means, non-finite standard deviations and negative
/// standard deviations. A zero standard deviation is allowed and yields a
/// point mass at `mean`.
pub fn normal(mean: f64, stddev: f64) -> Result<Normal<f64>> {
    if !mean.is_finite() {
        return Err(SimulationError::invalid_parameter(format!(
            "mean must be finite, got {mean}"
        )));
    }
    if !stddev.is_finite() || stddev < 0.0 {
        return Err(SimulationError::invalid_parameter(format!(
            "stddev must be finite and non-negative, got {stddev}"
        )));
    }
    Normal::new(mean, stddev).map_err(|e| SimulationError::invalid_parameter(e.to_string()))
}

/// How generators are seeded for one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPlan {
    /// Each source draws its seed from the OS-seeded thread RNG.
    #[default]
    Entropy,
    /// Each source is derived from a master seed and its stream id.
    Fixed(u64),
}

impl SeedPlan {
    /// Plan for an optional master seed.
    #[must_use]
    pub const fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(master) => Self::Fixed(master),
            None => Self::Entropy,
        }
    }

    /// Create the generator for `stream`.
    ///
    /// Under [`SeedPlan::Entropy`] the stream id is ignored and every call
    /// returns an independently seeded source.
    #[must_use]
    pub fn source(self, stream: u64) -> RandomSource {
        match self {
            Self::Entropy => RandomSource::from_entropy(),
            Self::Fixed(master) => {
                RandomSource::seeded(master.wrapping_add(stream.wrapping_mul(STREAM_GAMMA)))
            }
        }
    }
}

/// Private sampler owned by exactly one worker.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Seed from the OS-backed thread generator.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Seed deterministically.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw from `Normal(mean, stddev)`.
    pub fn sample(&mut self, mean: f64, stddev: f64) -> Result<f64> {
        let dist = normal(mean, stddev)?;
        Ok(dist.sample(&mut self.rng))
    }

    /// Draw from a pre-validated normal distribution.
    #[inline]
    pub fn draw(&mut self, dist: &Normal<f64>) -> f64 {
        dist.sample(&mut self.rng)
    }

    /// Draw from `Uniform[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}
