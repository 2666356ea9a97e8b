// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! VaR Engine - Monte Carlo Value-at-Risk
//!
//! Estimates portfolio Value-at-Risk by Monte Carlo simulation and compares
//! three execution strategies for the trial loop.
//!
//! # Data Flow
//!
//! `PortfolioGenerator` → `Portfolio` → `TrialEngine` (under an
//! `ExecutionStrategy`) → loss distribution → `var::value_at_risk`
//!
//! # Modules
//!
//! - [`random`]: per-worker generators and seeding
//! - [`portfolio`]: portfolio model and random generation
//! - [`simulation`]: execution strategies, trial loop, [`Engine`] facade
//! - [`var`]: VaR, expected shortfall and distribution statistics
//! - [`bench`]: strategy timing, speedup and efficiency
//! - [`config`]: YAML run configuration
//! - [`telemetry`]: tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod bench;
pub mod config;
pub mod error;
pub mod portfolio;
pub mod random;
pub mod simulation;
pub mod telemetry;
pub mod var;

pub use error::{Result, SimulationError};
pub use portfolio::{Portfolio, PortfolioGenerator};
pub use random::{RandomSource, SeedPlan};
pub use simulation::{Engine, ExecutionConfig, RunStats, SimulationConfig, Strategy};
pub use var::{RiskSummary, value_at_risk};
