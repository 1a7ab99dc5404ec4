//! sitrep binary.
//!
//! Loads configuration, initializes tracing, and runs the [`Engine`] until
//! interrupted.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use sr_core::config::AppConfig;
use sr_core::logging::{init_tracing, LogFormat};
use sr_server::Engine;

/// Situational aggregation and risk-scoring engine
#[derive(Parser, Debug)]
#[command(name = "sitrep", about = "Situational aggregation and risk-scoring engine")]
struct Args {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit newline-delimited JSON logs instead of pretty output.
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config)?;

    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(format).context("failed to install tracing subscriber")?;

    tracing::info!(
        provider = %config.provider.base_url,
        monitor_location = %config.monitor.location,
        port = config.server.port,
        "starting sitrep"
    );

    let engine = Engine::new(config)?;
    engine.run().await
}
