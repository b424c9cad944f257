use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};

use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{init_logging, session_config};

pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();

    init_logging(&cli.log_level, cli.debug)?;
    debug!("browsercli v{}", env!("CARGO_PKG_VERSION"));

    let config = session_config(&cli);

    match dispatch(cli.command, &config).await {
        Ok(()) => Ok(()),
        Err(err) => {
            error!("command failed: {err:#}");
            Err(err)
        }
    }
}
