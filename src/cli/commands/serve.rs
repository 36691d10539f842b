//! Server command.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::server;

/// Run the HTTP server until Ctrl-C.
pub fn cmd_serve(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    rt.block_on(server::serve(config))?;
    Ok(())
}
