use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use cdp_session::{with_active_page, PageRequest, SessionConfig};
use serde::Deserialize;
use tracing::info;

use super::commands::PageArgs;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetInfo {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    devtools_frontend_url: Option<String>,
    #[serde(default)]
    url: String,
}

/// Open the DevTools frontend for the first page target in the system
/// browser. With a URL, navigate there first so DevTools lands on it.
pub async fn cmd_debug(args: PageArgs, config: &SessionConfig) -> Result<()> {
    if let Some(url) = args.url {
        let navigated: Result<()> =
            with_active_page(config, PageRequest::navigate(url), |_page| async move {
                Ok(())
            })
            .await;
        navigated?;
    }

    let endpoint = config.endpoint();
    let targets: Vec<TargetInfo> = reqwest::get(format!("{endpoint}/json"))
        .await
        .with_context(|| format!("no browser listening at {endpoint}"))?
        .json()
        .await?;

    let page = targets
        .iter()
        .find(|target| target.kind == "page")
        .context("no page target to inspect")?;
    let frontend = page
        .devtools_frontend_url
        .as_deref()
        .context("page target has no DevTools frontend URL")?;
    let frontend = if frontend.starts_with("http") {
        frontend.to_string()
    } else {
        format!("{endpoint}{frontend}")
    };

    info!(url = %page.url, "opening DevTools");
    open_in_system_browser(&frontend)
}

fn open_in_system_browser(url: &str) -> Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    };

    match command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        // Detached on purpose; the opener outlives this invocation.
        Ok(_child) => Ok(()),
        Err(err) => bail!("failed to launch browser opener: {err}"),
    }
}
