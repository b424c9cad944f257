use anyhow::{Context, Result};
use cdp_session::{PageRequest, SessionConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::env::CliArgs;

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

/// Session configuration from defaults and env overrides, with CLI flags
/// taking precedence over both.
pub fn session_config(cli: &CliArgs) -> SessionConfig {
    let mut config = SessionConfig::default();
    if let Some(port) = cli.port {
        config.debug_port = port;
    }
    if let Some(chrome) = &cli.chrome {
        config.executable = chrome.clone();
    }
    if let Some(profile) = &cli.profile {
        config.user_data_dir = profile.clone();
    }
    config
}

/// Navigate when a URL was given, otherwise act on the visible tab.
pub fn page_request(url: Option<String>) -> PageRequest {
    match url {
        Some(url) => PageRequest::navigate(url),
        None => PageRequest::active(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::Commands;
    use clap::Parser;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn cli_flags_override_defaults() {
        let cli = parse(&["browsercli", "--port", "9444", "dump"]);
        let config = session_config(&cli);
        assert_eq!(config.debug_port, 9444);
        assert!(matches!(cli.command, Commands::Dump));
    }

    #[test]
    fn page_request_maps_url_presence() {
        assert!(page_request(None).url.is_none());
        assert_eq!(
            page_request(Some("example.com".into())).url.as_deref(),
            Some("example.com")
        );
    }
}
