//! Log subscriber setup
//!
//! The filter comes from `VIDTENSOR_LOG`, then `RUST_LOG`, then the
//! `--log-level` argument. Logs go to stderr so stdout stays parseable.

use anyhow::Context;
use clap::ValueEnum;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

pub fn init(default_level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("VIDTENSOR_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .or_else(|_| EnvFilter::try_new(default_level))
        .with_context(|| format!("invalid log filter {default_level:?}"))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
    };
    installed.context("failed to install log subscriber")
}
