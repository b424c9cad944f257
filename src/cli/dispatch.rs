use anyhow::Result;
use cdp_session::SessionConfig;

use super::actions::{cmd_click, cmd_dump, cmd_press, cmd_scroll_bottom, cmd_type};
use super::commands::Commands;
use super::content::{cmd_get_aria_snapshot, cmd_get_markdown, cmd_get_text, cmd_scrape};
use super::debug::cmd_debug;
use super::session_cmds::{cmd_close_browser, cmd_close_pages, cmd_open};

pub async fn dispatch(command: Commands, config: &SessionConfig) -> Result<()> {
    match command {
        Commands::Open(args) => cmd_open(args, config).await,
        Commands::ClosePages => cmd_close_pages(config).await,
        Commands::CloseBrowser => cmd_close_browser(config).await,
        Commands::GetText(args) => cmd_get_text(args, config).await,
        Commands::GetMarkdown(args) => cmd_get_markdown(args, config).await,
        Commands::GetAriaSnapshot(args) => cmd_get_aria_snapshot(args, config).await,
        Commands::ScrollBottom => cmd_scroll_bottom(config).await,
        Commands::Click(args) => cmd_click(args, config).await,
        Commands::Type(args) => cmd_type(args, config).await,
        Commands::Press(args) => cmd_press(args, config).await,
        Commands::Dump => cmd_dump(config).await,
        Commands::Debug(args) => cmd_debug(args, config).await,
        Commands::Scrape(args) => cmd_scrape(args, config).await,
    }
}
