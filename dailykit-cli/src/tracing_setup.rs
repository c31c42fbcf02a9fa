//! Tracing setup for the dailykit binary
//!
//! Usage:
//!   dailykit --debug serve               # Debug logging to stderr
//!   dailykit --log-format json serve     # One JSON object per event
//!   RUST_LOG=dailykit_server=debug dailykit serve
//!
//! Environment variables:
//!   RUST_LOG                             # Log filter (default: info)

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Event formatter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable, one line per event
    #[default]
    Compact,
    /// Newline-delimited JSON
    Json,
}

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets the default filter to debug)
    pub debug: bool,
    pub format: LogFormat,
}

fn filter(config: &TracingConfig) -> EnvFilter {
    let default = if config.debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &TracingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(config))
        .with_writer(std::io::stderr)
        .with_target(config.debug); // Show targets in debug mode

    match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|err| anyhow!(err))
}
