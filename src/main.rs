//! Summary aggregator service.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │               SUMMARY AGGREGATOR              │
//!   GET /chat/summary     │  ┌────────┐    ┌─────────────┐                │
//!   ──────────────────────┼─▶│  http  │───▶│ coordinator │── deadline ─┐  │
//!                         │  └────────┘    └──────┬──────┘             │  │
//!                         │                       │ fan-out            │  │
//!                         │        ┌──────────────┼──────────────┐     │  │
//!                         │        ▼              ▼              ▼     ▼  │
//!                         │   ┌─────────┐   ┌──────────┐   ┌──────────┐   │
//!                         │   │identity │   │  access  │   │ context  │   │
//!                         │   │mandatory│   │mandatory │   │ optional │   │
//!                         │   └────┬────┘   └────┬─────┘   └────┬─────┘   │
//!                         │        └── one-slot channels ───────┘         │
//!   200 JSON / 500 text   │                       │ ordered collection    │
//!   ◀─────────────────────┼───────────────────────┘ then drain            │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use summary_aggregator::config::loader::load_config;
use summary_aggregator::config::validation::validate_config;
use summary_aggregator::config::AggregatorConfig;
use summary_aggregator::lifecycle::{startup, Shutdown};
use summary_aggregator::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "summary-aggregator")]
#[command(about = "Fan-out chat summary aggregator", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AggregatorConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            eprintln!("invalid configuration: {}", error);
        }
        return Err("invalid configuration".into());
    }

    init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        budget_ms = config.deadline.budget_ms,
        context_seed = ?config.upstreams.context.seed,
        metrics_enabled = config.observability.metrics_enabled,
        "summary-aggregator v0.1.0 starting"
    );

    startup::run(config, Shutdown::new()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
