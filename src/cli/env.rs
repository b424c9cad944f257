use std::path::PathBuf;

use clap::Parser;

use super::commands::Commands;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Remote debugging port (overrides BROWSERCLI_PORT)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Chrome/Chromium executable (overrides BROWSERCLI_CHROME)
    #[arg(long, value_name = "PATH")]
    pub chrome: Option<PathBuf>,

    /// Browser profile directory (overrides BROWSERCLI_PROFILE)
    #[arg(long, value_name = "DIR")]
    pub profile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
