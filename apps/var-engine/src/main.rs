//! VaR Engine Binary
//!
//! Sweeps the configured trial counts, runs every configured strategy on
//! the same portfolio, and prints a runtime / speedup / efficiency report.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin var-engine
//! ```
//!
//! # Environment Variables
//!
//! - `VAR_ENGINE_CONFIG`: path to a YAML config (default: built-in defaults)
//! - `RUST_LOG`: log filter (default: `var_engine=<logging.level>`)

use anyhow::Context;
use var_engine::bench;
use var_engine::config::{Config, ReportFormat, load_config};
use var_engine::telemetry::init_tracing;

fn main() -> anyhow::Result<()> {
    let config = match std::env::var("VAR_ENGINE_CONFIG") {
        Ok(path) => load_config(Some(&path)).with_context(|| format!("loading {path}"))?,
        Err(_) => Config::default(),
    };

    init_tracing(&config.observability.logging);

    tracing::info!(
        trial_sizes = ?config.simulation.trial_sizes,
        assets = config.simulation.num_assets,
        confidence_level = config.simulation.confidence_level,
        seeded = config.simulation.seed.is_some(),
        "Starting VaR strategy sweep"
    );

    let report = bench::sweep(&config.sweep_plan()).context("strategy sweep failed")?;

    match config.report.format {
        ReportFormat::Text => print!("{report}"),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
