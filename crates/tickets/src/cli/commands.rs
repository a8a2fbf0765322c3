//! # CLI Layer
//!
//! The CLI layer is the **only** place in the workspace that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the tracing subscriber
//! - Handles argument parsing
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: shell arguments into typed commands via clap
//! 2. **Context Setup**: config, logging and the API over the data directory
//! 3. **Dispatch**: route the command to its handler

use clap::Parser;
use ticketsapp::api::TicketsApi;
use ticketsapp::config::TicketsConfig;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::handlers;
use super::setup::Cli;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = TicketsConfig::load(cli.config.as_deref())?;
    init_tracing(&config, cli.verbose);

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir());
    debug!(data_dir = %data_dir.display(), "Opening ticket store");
    let mut api = TicketsApi::open(data_dir)?;

    handlers::dispatch(&mut api, cli.command).await
}

/// `RUST_LOG` wins; otherwise `-v` flags, then the configured filter.
fn init_tracing(config: &TicketsConfig, verbose: u8) {
    let default_directive = match verbose {
        0 => config.log.as_str(),
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}
