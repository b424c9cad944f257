use action_dispatch::{click, dump, press_key, scroll_to_bottom, type_text};
use anyhow::Result;
use cdp_session::{with_active_page, PageRequest, SessionConfig};

use super::commands::{ComboArgs, TextArgs};

pub async fn cmd_click(args: TextArgs, config: &SessionConfig) -> Result<()> {
    with_active_page(config, PageRequest::active(), |page| async move {
        click(&page, &args.text).await?;
        Ok(())
    })
    .await
}

pub async fn cmd_type(args: TextArgs, config: &SessionConfig) -> Result<()> {
    with_active_page(config, PageRequest::active(), |page| async move {
        type_text(&page, &args.text).await?;
        Ok(())
    })
    .await
}

pub async fn cmd_press(args: ComboArgs, config: &SessionConfig) -> Result<()> {
    with_active_page(config, PageRequest::active(), |page| async move {
        press_key(&page, &args.combo).await?;
        Ok(())
    })
    .await
}

pub async fn cmd_scroll_bottom(config: &SessionConfig) -> Result<()> {
    with_active_page(config, PageRequest::active(), |page| async move {
        scroll_to_bottom(&page).await?;
        Ok(())
    })
    .await
}

pub async fn cmd_dump(config: &SessionConfig) -> Result<()> {
    with_active_page(config, PageRequest::active(), |page| async move {
        let candidates = dump(&page).await?;
        for candidate in &candidates {
            let (x, y) = candidate.rect.center();
            println!("({x:.0}, {y:.0}) {}", candidate.text);
        }
        Ok(())
    })
    .await
}
