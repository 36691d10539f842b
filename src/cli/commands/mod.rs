//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `serve`: HTTP server
//! - `search`: one-off upstream searches
//! - `recommend`: mood suggestions
//! - `downloads`: persisted download history

mod downloads;
mod recommend;
mod search;
mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::{self, Config};

pub use downloads::{cmd_downloads_clear, cmd_downloads_list};
pub use recommend::cmd_recommend;
pub use search::cmd_search;
pub use serve::cmd_serve;

/// Tunebridge CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: OS config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Listen address, e.g. 127.0.0.1:3000
        #[arg(short, long)]
        bind: Option<String>,
        /// Google Natural Language API key (or set GOOGLE_API_KEY env var)
        #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Search the upstream API and print JSON
    Search {
        /// songs, playlists, albums or all
        kind: String,
        /// Search terms
        query: String,
    },
    /// Suggest search queries for a mood
    Recommend {
        /// Free text to infer the mood from
        #[arg(short, long, default_value = "")]
        text: String,
        /// telugu, english, tamil, hindi, kannada, malayalam or all
        #[arg(short, long)]
        language: Option<String>,
        /// upbeat, calm, neutral, romantic, sad or focus
        #[arg(short, long)]
        mood: Option<String>,
        /// Google Natural Language API key (or set GOOGLE_API_KEY env var)
        #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Inspect the download history
    Downloads {
        #[command(subcommand)]
        action: DownloadsAction,
    },
}

#[derive(Subcommand)]
pub enum DownloadsAction {
    /// List recorded downloads, most recent first
    List,
    /// Forget all recorded downloads
    Clear,
}

impl Cli {
    /// Load the configuration this invocation refers to.
    pub fn load_config(&self) -> Config {
        match &self.config {
            Some(path) => config::load_from(path),
            None => config::load(),
        }
    }
}

/// Run the specified CLI command.
///
/// Returns `Ok(true)` if a command was run, `Ok(false)` if no command was specified
/// (meaning the server should start with configured defaults).
pub fn run_command(cli: &Cli) -> anyhow::Result<bool> {
    let Some(command) = &cli.command else {
        return Ok(false);
    };

    let rt = Runtime::new()?;
    let mut config = cli.load_config();

    match command {
        Commands::Serve { bind, api_key } => {
            if let Some(bind) = bind {
                config.server.bind = bind.clone();
            }
            if api_key.is_some() {
                config.credentials.sentiment_api_key = api_key.clone();
            }
            cmd_serve(&rt, &config)?;
        }
        Commands::Search { kind, query } => {
            cmd_search(&rt, &config, kind, query)?;
        }
        Commands::Recommend {
            text,
            language,
            mood,
            api_key,
        } => {
            if api_key.is_some() {
                config.credentials.sentiment_api_key = api_key.clone();
            }
            cmd_recommend(&rt, &config, text, language.as_deref(), mood.as_deref())?;
        }
        Commands::Downloads { action } => match action {
            DownloadsAction::List => cmd_downloads_list(&config)?,
            DownloadsAction::Clear => cmd_downloads_clear(&config)?,
        },
    }

    Ok(true)
}
