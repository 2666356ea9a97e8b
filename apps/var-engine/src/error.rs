//! Error types for the simulation core.
//!
//! Every failure is raised where the bad value first becomes observable
//! (construction, weight normalisation, sampling parameters, quantile
//! indexing) and returned to the caller as a typed variant. Nothing in the
//! core converts a failure into NaN or logs and continues.

use thiserror::Error;

/// Errors from portfolio generation, trial execution and VaR extraction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Invalid construction parameters.
    #[error("Invalid simulation config: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Weight normalisation would divide by a zero or near-zero sum.
    #[error("Degenerate portfolio weights: sum {weight_sum} cannot be normalised")]
    DegenerateInput {
        /// Raw weight sum observed before normalisation.
        weight_sum: f64,
    },

    /// Distribution parameters are non-finite or out of domain.
    #[error("Invalid distribution parameter: {message}")]
    InvalidParameter {
        /// Error message.
        message: String,
    },

    /// Quantile index falls outside the loss distribution.
    #[error("Quantile index {index} out of range for {len} losses")]
    Range {
        /// Computed index.
        index: usize,
        /// Length of the loss distribution.
        len: usize,
    },

    /// Results were queried before any run.
    #[error("No simulation has been run yet")]
    NotRun,

    /// Worker pool initialization failed.
    #[error("Failed to initialize thread pool: {message}")]
    ThreadPool {
        /// Error message.
        message: String,
    },
}

impl SimulationError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}

/// Result alias for the simulation core.
pub type Result<T> = std::result::Result<T, SimulationError>;
