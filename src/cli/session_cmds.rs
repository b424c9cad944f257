use anyhow::Result;
use cdp_session::{with_active_page, PageRequest, Session, SessionConfig};
use tracing::info;

use super::commands::OpenArgs;

pub async fn cmd_open(args: OpenArgs, config: &SessionConfig) -> Result<()> {
    let mut config = config.clone();
    if args.non_headless {
        config.headless = false;
    }

    let request = PageRequest::navigate(args.url.clone());
    with_active_page(&config, request, |page| async move {
        let url = page.url().await?;
        info!(url = url.as_deref().unwrap_or(&args.url), "page ready");
        Ok(())
    })
    .await
}

pub async fn cmd_close_pages(config: &SessionConfig) -> Result<()> {
    let mut session = Session::connect(config).await?;
    let result = session.close_all_pages().await;
    session.disconnect();
    result.map_err(Into::into)
}

pub async fn cmd_close_browser(config: &SessionConfig) -> Result<()> {
    let mut session = Session::connect(config).await?;
    let result = session.close_browser().await;
    session.disconnect();
    result.map_err(Into::into)
}
