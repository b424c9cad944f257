use anyhow::Result;
use cdp_session::{with_active_page, SessionConfig};
use content_extract::{aria_snapshot, get_markdown, get_text, scrape};

use super::commands::{PageArgs, ScrapeArgs};
use super::runtime::page_request;

pub async fn cmd_get_text(args: PageArgs, config: &SessionConfig) -> Result<()> {
    with_active_page(config, page_request(args.url), |page| async move {
        println!("{}", get_text(&page).await?);
        Ok(())
    })
    .await
}

pub async fn cmd_get_markdown(args: PageArgs, config: &SessionConfig) -> Result<()> {
    with_active_page(config, page_request(args.url), |page| async move {
        println!("{}", get_markdown(&page).await?);
        Ok(())
    })
    .await
}

pub async fn cmd_get_aria_snapshot(args: PageArgs, config: &SessionConfig) -> Result<()> {
    with_active_page(config, page_request(args.url), |page| async move {
        println!("{}", aria_snapshot(&page).await?);
        Ok(())
    })
    .await
}

pub async fn cmd_scrape(args: ScrapeArgs, config: &SessionConfig) -> Result<()> {
    with_active_page(config, page_request(None), |page| async move {
        let filters = (!args.filter.is_empty()).then_some(args.filter.as_slice());
        let items = scrape(&page, filters).await?;
        println!("{}", serde_json::to_string_pretty(&items)?);
        Ok(())
    })
    .await
}
