//! Tracing setup for the `var-engine` binary.
//!
//! `RUST_LOG` takes precedence; otherwise the configured level applies to
//! this crate.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Filter used when `RUST_LOG` is unset.
fn fallback_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_new(format!("var_engine={}", logging.level))
        .unwrap_or_else(|_| EnvFilter::new("var_engine=info"))
}

/// Install the global tracing subscriber.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(logging: &LoggingConfig) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter(logging));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(logging.with_target)
        .try_init()
        .is_ok()
}
