//! Command-line interface for tunebridge.
//!
//! This module provides CLI commands for running the server and for
//! querying search, suggestions and the persisted download history from a
//! terminal.

mod commands;

pub use commands::{Cli, Commands, DownloadsAction, run_command};
