//! Run configuration for the benchmark binary.
//!
//! Loads a YAML file, interpolates environment variables, and validates the
//! result before any engine is built.
//!
//! # Usage
//!
//! ```rust,ignore
//! use var_engine::config::load_config;
//!
//! // Load from default path (var-engine.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("configs/sweep.yaml"))?;
//!
//! println!("assets: {}", config.simulation.num_assets);
//! ```
//!
//! # Example
//!
//! ```yaml
//! simulation:
//!   trial_sizes: [1000000, 5000000]
//!   num_assets: 10
//!   confidence_level: 0.95
//!   seed: ${VAR_ENGINE_SEED:-}
//! execution:
//!   max_threads: 0
//! strategies: [SEQUENTIAL, DATA_PARALLEL, TASK_PARALLEL]
//! observability:
//!   logging:
//!     level: info
//! report:
//!   format: text
//! ```

mod observability;
mod simulation;

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bench::SweepPlan;
use crate::simulation::{ExecutionConfig, SimulationConfig, Strategy};

pub use observability::{LoggingConfig, ObservabilityConfig};
pub use simulation::{ReportConfig, ReportFormat, SimulationSettings};

/// Default configuration path.
pub const DEFAULT_CONFIG_PATH: &str = "var-engine.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Sweep parameters.
    #[serde(default)]
    pub simulation: SimulationSettings,
    /// Worker pool tuning.
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Strategies to compare, in run order.
    #[serde(default = "default_strategies")]
    pub strategies: Vec<Strategy>,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Report configuration.
    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationSettings::default(),
            execution: ExecutionConfig::default(),
            strategies: default_strategies(),
            observability: ObservabilityConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Config {
    /// Sweep plan described by this configuration.
    #[must_use]
    pub fn sweep_plan(&self) -> SweepPlan {
        SweepPlan {
            trial_sizes: self.simulation.trial_sizes.clone(),
            num_assets: self.simulation.num_assets,
            confidence_level: self.simulation.confidence_level,
            seed: self.simulation.seed,
            execution: self.execution,
            strategies: self.strategies.clone(),
        }
    }
}

fn default_strategies() -> Vec<Strategy> {
    Strategy::ALL.to_vec()
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to [`DEFAULT_CONFIG_PATH`].
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let sim = &config.simulation;

    if sim.trial_sizes.is_empty() {
        return Err(ConfigError::ValidationError(
            "simulation.trial_sizes must not be empty".to_string(),
        ));
    }

    if config.strategies.is_empty() {
        return Err(ConfigError::ValidationError(
            "strategies must not be empty".to_string(),
        ));
    }

    for &num_trials in &sim.trial_sizes {
        SimulationConfig::new(num_trials, sim.num_assets, sim.confidence_level)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.simulation.trial_sizes, vec![1_000_000, 5_000_000]);
        assert_eq!(config.simulation.num_assets, 10);
        assert!((config.simulation.confidence_level - 0.95).abs() < f64::EPSILON);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.execution.max_threads, 0);
        assert_eq!(config.strategies, Strategy::ALL.to_vec());
        assert_eq!(config.observability.logging.level, "info");
        assert_eq!(config.report.format, ReportFormat::Text);
    }

    #[test]
    fn test_load_empty_document_uses_defaults() {
        let config = match load_config_from_string("{}") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_full_config() {
        let yaml = r"
simulation:
  trial_sizes: [1000, 2000]
  num_assets: 4
  confidence_level: 0.99
  seed: 42
execution:
  max_threads: 2
strategies: [TASK_PARALLEL, SEQUENTIAL]
observability:
  logging:
    level: debug
    with_target: false
report:
  format: json
";
        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.simulation.trial_sizes, vec![1000, 2000]);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.execution.max_threads, 2);
        assert_eq!(
            config.strategies,
            vec![Strategy::TaskParallel, Strategy::Sequential]
        );
        assert!(!config.observability.logging.with_target);
        assert_eq!(config.report.format, ReportFormat::Json);

        let plan = config.sweep_plan();
        assert_eq!(plan.num_assets, 4);
        assert_eq!(plan.seed, Some(42));
        assert_eq!(plan.strategies.len(), 2);
    }

    #[test]
    fn test_zero_trials_rejected() {
        let yaml = "simulation:\n  trial_sizes: [1000, 0]\n";
        assert!(matches!(
            load_config_from_string(yaml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let yaml = "simulation:\n  confidence_level: 1.0\n";
        assert!(matches!(
            load_config_from_string(yaml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_empty_strategies_rejected() {
        assert!(matches!(
            load_config_from_string("strategies: []\n"),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_unknown_strategy_is_parse_error() {
        assert!(matches!(
            load_config_from_string("strategies: [GPU]\n"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "assets: ${VAR_ENGINE_CONFIG_TEST_NONEXISTENT_VAR:-12}";
        assert_eq!(interpolate_env_vars(input), "assets: 12");
    }

    #[test]
    fn test_env_var_without_default_when_missing() {
        let input = "seed: ${VAR_ENGINE_CONFIG_TEST_NONEXISTENT_VAR}";
        assert_eq!(interpolate_env_vars(input), "seed: ");
    }

    #[test]
    fn test_missing_seed_interpolates_to_null() {
        let yaml = "simulation:\n  seed: ${VAR_ENGINE_CONFIG_TEST_NONEXISTENT_SEED:-}\n";
        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.simulation.seed, None);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_config(Some("/nonexistent/var-engine.yaml")),
            Err(ConfigError::ReadError { .. })
        ));
    }
}
