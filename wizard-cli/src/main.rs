//! Binary crate for the `weather-wizard` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive location picking and configuration
//! - Human-friendly output formatting

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

/// Logs go to stderr so they never mix with the report on stdout. `RUST_LOG` overrides.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
