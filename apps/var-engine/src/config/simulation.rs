//! Simulation sweep and report configuration.

use serde::{Deserialize, Serialize};

/// Parameters shared by every run in a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Trial counts to sweep.
    #[serde(default = "default_trial_sizes")]
    pub trial_sizes: Vec<usize>,
    /// Assets per portfolio.
    #[serde(default = "default_num_assets")]
    pub num_assets: usize,
    /// Confidence level for VaR.
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    /// Master seed (omit for fresh entropy).
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            trial_sizes: default_trial_sizes(),
            num_assets: default_num_assets(),
            confidence_level: default_confidence_level(),
            seed: None,
        }
    }
}

fn default_trial_sizes() -> Vec<usize> {
    vec![1_000_000, 5_000_000]
}

const fn default_num_assets() -> usize {
    10
}

const fn default_confidence_level() -> f64 {
    0.95
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable comparison tables.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Report configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: ReportFormat,
}
