//! Tunebridge - music search, streaming proxy and play-queue engine.
//!
//! Runs the HTTP server by default, or one of the CLI commands.

use clap::Parser;
use tokio::runtime::Runtime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tunebridge::{cli, server};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("tunebridge=info".parse()?))
        .init();

    // Try to run a CLI command
    if cli::run_command(&args)? {
        // A command was executed, exit normally
        return Ok(());
    }

    // No command specified, serve with configured defaults
    let config = args.load_config();
    let rt = Runtime::new()?;
    rt.block_on(server::serve(&config))?;
    Ok(())
}
