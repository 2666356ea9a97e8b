//! Value at Risk (`VaR`) extraction from a simulated loss distribution.
//!
//! - `VaR`: the sorted loss at index `floor((1 - confidence_level) * n)`
//! - Expected shortfall: mean of the sorted losses up to and including
//!   that index
//! - Distribution statistics (mean, sample standard deviation, min, max)
//!
//! Every index is bounds-checked; an index outside the distribution is a
//! [`SimulationError::Range`], never a clamp.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Result, SimulationError};

/// `VaR` analysis of one loss distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskSummary {
    /// Confidence level (e.g., 0.95).
    pub confidence_level: f64,
    /// Number of losses analysed.
    pub num_trials: usize,
    /// Quantile index into the sorted losses.
    pub index: usize,
    /// Value at Risk.
    pub var: f64,
    /// Mean of the sorted losses at positions `0..=index`.
    pub expected_shortfall: f64,
    /// Mean loss.
    pub mean: f64,
    /// Sample standard deviation of losses.
    pub std_dev: f64,
    /// Minimum loss.
    pub min: f64,
    /// Maximum loss.
    pub max: f64,
    /// Fraction of trials with a strictly positive loss.
    pub prob_positive_loss: f64,
}

/// Rounding slack, in units of `f64::EPSILON` times the multiplier.
const SNAP_ULPS: f64 = 4.0;

/// `floor(x)` for `x = fraction * scale`, except values within rounding
/// noise of an integer snap to it, so `(1 - 0.9) * 10` floors to 1.
///
/// Representing the fraction costs at most about `scale * EPSILON`, so the
/// window grows with `scale` and never swallows a real fractional part.
fn floor_snapped(x: f64, scale: f64) -> f64 {
    let nearest = x.round();
    if (x - nearest).abs() <= SNAP_ULPS * f64::EPSILON * scale.max(1.0) {
        nearest
    } else {
        x.floor()
    }
}

/// Quantile index `floor((1 - confidence_level) * len)`.
///
/// A confidence level at or beyond 1 maps to the upper percentile position
/// `len`, which is out of bounds. Non-finite levels are rejected as
/// invalid parameters.
pub fn quantile_index(len: usize, confidence_level: f64) -> Result<usize> {
    if !confidence_level.is_finite() {
        return Err(SimulationError::invalid_parameter(format!(
            "confidence_level must be finite, got {confidence_level}"
        )));
    }
    if confidence_level >= 1.0 {
        return Err(SimulationError::Range { index: len, len });
    }

    let index = floor_snapped((1.0 - confidence_level) * len as f64, len as f64) as usize;
    if index >= len {
        return Err(SimulationError::Range { index, len });
    }
    Ok(index)
}

/// Bounds-checked read of the `p` percentile (`floor(p * len)`) of an
/// ascending slice.
pub fn percentile(sorted: &[f64], p: f64) -> Result<f64> {
    let len = sorted.len();
    if !(0.0..1.0).contains(&p) {
        let index = if p.is_finite() && p > 0.0 {
            floor_snapped(p * len as f64, len as f64) as usize
        } else {
            0
        };
        return Err(SimulationError::Range { index, len });
    }
    let index = floor_snapped(p * len as f64, len as f64) as usize;
    sorted
        .get(index)
        .copied()
        .ok_or(SimulationError::Range { index, len })
}

/// Ascending copy of `losses`.
fn sorted_copy(losses: &[f64]) -> Vec<f64> {
    let mut sorted = losses.to_vec();
    sorted.par_sort_unstable_by(f64::total_cmp);
    sorted
}

/// Value at Risk of `losses` at `confidence_level`.
///
/// # Errors
///
/// Returns [`SimulationError::Range`] when the quantile index falls
/// outside the distribution (empty input, confidence level at or beyond
/// 1, or at or below 0).
pub fn value_at_risk(losses: &[f64], confidence_level: f64) -> Result<f64> {
    let index = quantile_index(losses.len(), confidence_level)?;
    let sorted = sorted_copy(losses);
    sorted
        .get(index)
        .copied()
        .ok_or(SimulationError::Range {
            index,
            len: sorted.len(),
        })
}

/// Full `VaR` analysis of `losses` at `confidence_level`.
///
/// Same error rules as [`value_at_risk`].
pub fn analyze(losses: &[f64], confidence_level: f64) -> Result<RiskSummary> {
    let n = losses.len();
    let index = quantile_index(n, confidence_level)?;
    let sorted = sorted_copy(losses);

    let var = *sorted
        .get(index)
        .ok_or(SimulationError::Range { index, len: n })?;

    let tail = &sorted[..=index];
    let expected_shortfall = tail.iter().sum::<f64>() / tail.len() as f64;

    let mean = sorted.iter().sum::<f64>() / n as f64;
    let variance = if n > 1 {
        sorted.iter().map(|l| (l - mean) * (l - mean)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };

    let positive = sorted.iter().filter(|l| **l > 0.0).count();

    Ok(RiskSummary {
        confidence_level,
        num_trials: n,
        index,
        var,
        expected_shortfall,
        mean,
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[n - 1],
        prob_positive_loss: positive as f64 / n as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(10, 0.9, 1 ; "ten trials at ninety")]
    #[test_case(100, 0.95, 5 ; "hundred at ninety five")]
    #[test_case(1000, 0.99, 10 ; "thousand at ninety nine")]
    #[test_case(1, 0.5, 0 ; "single trial")]
    #[test_case(5_000_000, 0.95, 250_000 ; "five million")]
    #[test_case(10_000, 0.9999, 1 ; "ten thousand at four nines")]
    #[test_case(100_000_000, 0.876_543_210_1, 12_345_678 ; "fractional product at large n")]
    #[test_case(100, 1e-12, 99 ; "tiny level keeps last index")]
    fn test_quantile_index(len: usize, level: f64, expected: usize) {
        assert_eq!(quantile_index(len, level).unwrap(), expected);
    }

    #[test]
    fn test_floor_snapped() {
        assert_eq!(floor_snapped(0.999_999_999_999_999_8, 10.0), 1.0);
        assert_eq!(floor_snapped(1.999_999_999_999_999_6, 10.0), 2.0);
        assert_eq!(floor_snapped(2.5, 10.0), 2.0);
        assert_eq!(floor_snapped(0.3, 10.0), 0.0);
        assert_eq!(floor_snapped(12_345_678.989_999_998, 1e8), 12_345_678.0);
        assert_eq!(floor_snapped(99.999_999_999_9, 100.0), 99.0);
    }

    #[test]
    fn test_quantile_index_confidence_one_is_out_of_range() {
        assert_eq!(
            quantile_index(100, 1.0),
            Err(SimulationError::Range {
                index: 100,
                len: 100
            })
        );
    }

    #[test]
    fn test_quantile_index_confidence_zero_is_out_of_range() {
        assert_eq!(
            quantile_index(100, 0.0),
            Err(SimulationError::Range {
                index: 100,
                len: 100
            })
        );
    }

    #[test]
    fn test_quantile_index_empty() {
        assert_eq!(
            quantile_index(0, 0.95),
            Err(SimulationError::Range { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_quantile_index_nan() {
        assert!(matches!(
            quantile_index(10, f64::NAN),
            Err(SimulationError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_value_at_risk_picks_sorted_element() {
        let losses = vec![0.9, 0.1, 0.5, 0.3, 0.7, 0.2, 0.8, 0.4, 0.6, 0.0];
        // sorted: 0.0 0.1 0.2 ... 0.9, index 1
        assert_eq!(value_at_risk(&losses, 0.9).unwrap(), 0.1);
    }

    #[test]
    fn test_value_at_risk_does_not_mutate_input() {
        let losses = vec![3.0, 1.0, 2.0];
        value_at_risk(&losses, 0.5).unwrap();
        assert_eq!(losses, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_value_at_risk_constant_distribution() {
        let losses = vec![-0.05; 1000];
        for level in [0.5, 0.9, 0.95, 0.99, 0.999] {
            assert_eq!(value_at_risk(&losses, level).unwrap(), -0.05);
        }
    }

    #[test]
    fn test_value_at_risk_tiny_level_reads_last_element() {
        let losses: Vec<f64> = (0..100).map(f64::from).collect();
        assert_eq!(value_at_risk(&losses, 1e-12).unwrap(), 99.0);
    }

    #[test]
    fn test_value_at_risk_empty() {
        assert!(matches!(
            value_at_risk(&[], 0.95),
            Err(SimulationError::Range { .. })
        ));
    }

    #[test]
    fn test_analyze() {
        let losses: Vec<f64> = (1..=10).map(f64::from).collect();
        let summary = analyze(&losses, 0.8).unwrap();

        assert_eq!(summary.index, 2);
        assert_eq!(summary.var, 3.0);
        // (1 + 2 + 3) / 3
        assert_eq!(summary.expected_shortfall, 2.0);
        assert_eq!(summary.mean, 5.5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 10.0);
        assert_eq!(summary.prob_positive_loss, 1.0);
        assert!((summary.std_dev - 3.027_650_354_097_491_7).abs() < 1e-12);
    }

    #[test]
    fn test_analyze_matches_value_at_risk() {
        let losses = vec![0.3, -0.2, 0.1, -0.4, 0.0, 0.25, -0.05];
        let summary = analyze(&losses, 0.7).unwrap();
        assert_eq!(summary.var, value_at_risk(&losses, 0.7).unwrap());
        assert_eq!(summary.num_trials, 7);
    }

    #[test]
    fn test_analyze_single_loss() {
        let summary = analyze(&[0.5], 0.5).unwrap();
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.expected_shortfall, 0.5);
    }

    #[test]
    fn test_percentile() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0).unwrap(), 1.0);
        assert_eq!(percentile(&sorted, 0.5).unwrap(), 3.0);
        assert_eq!(percentile(&sorted, 0.99).unwrap(), 4.0);
        assert_eq!(
            percentile(&sorted, 1.0),
            Err(SimulationError::Range { index: 4, len: 4 })
        );
        assert!(percentile(&[], 0.5).is_err());
        assert!(percentile(&sorted, -0.1).is_err());
    }
}
