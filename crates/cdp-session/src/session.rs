//! Connection acquisition and active-page resolution.
//!
//! Acquisition order: attach to an already-running browser at the configured
//! endpoint; on failure launch a detached Chrome with remote debugging on the
//! same endpoint and retry attaching. The spawned process is deliberately
//! never reaped or killed here.

use std::collections::HashSet;
use std::future::Future;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::browser::CloseParams as BrowserCloseParams;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{self, EventResponseReceived, ResourceType};
use chromiumoxide::cdp::browser_protocol::page::{
    CloseParams, EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::handler::Handler;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::config::{
    SessionConfig, CLOSE_PAGES_BUDGET, NAV_SETTLE, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};
use crate::error::{ConnectError, SessionError};

/// How long after `goto` resolves we keep looking for the document's network
/// response before concluding none was observed (e.g. `about:blank`).
const RESPONSE_GRACE: Duration = Duration::from_millis(1500);

/// How often the session sweeps the target list for tabs created behind its
/// back (window.open, target=_blank).
const DIALOG_SCAN_INTERVAL: Duration = Duration::from_millis(500);

/// Which page a command wants to operate on.
#[derive(Clone, Debug, Default)]
pub struct PageRequest {
    /// Navigate a fresh tab here, closing all others. `None` selects the
    /// currently visible tab instead.
    pub url: Option<String>,
}

impl PageRequest {
    pub fn navigate(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    pub fn active() -> Self {
        Self::default()
    }
}

/// A live connection to a browser instance. Dropping (or calling
/// [`Session::disconnect`]) releases the connection only; the browser process
/// keeps running with its profile intact.
pub struct Session {
    browser: Arc<Browser>,
    guarded: Arc<Mutex<TabGuard>>,
    handler_task: JoinHandle<()>,
    dialog_task: JoinHandle<()>,
}

impl Session {
    /// Attach to the configured endpoint, launching a detached browser and
    /// retrying if nothing is listening there yet.
    pub async fn connect(config: &SessionConfig) -> Result<Self, SessionError> {
        let endpoint = config.endpoint();

        match Self::attach(&endpoint).await {
            Ok(session) => {
                info!(%endpoint, "attached to running browser");
                return Ok(session);
            }
            Err(err) => {
                debug!(%endpoint, %err, "no reachable browser, launching a new instance");
            }
        }

        spawn_detached_browser(config)?;

        let mut last_err = ConnectError::Exhausted;
        for attempt in 1..=config.connect_retries {
            sleep(config.connect_retry_delay).await;
            match Self::attach(&endpoint).await {
                Ok(session) => {
                    info!(%endpoint, attempt, "attached to launched browser");
                    return Ok(session);
                }
                Err(err) => {
                    debug!(attempt, %err, "connect attempt failed");
                    last_err = err;
                }
            }
        }

        Err(SessionError::Connect {
            endpoint,
            source: last_err,
        })
    }

    /// Resolve the websocket debugger URL from the JSON endpoint and connect.
    async fn attach(endpoint: &str) -> Result<Self, ConnectError> {
        let version: serde_json::Value = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?
            .get(format!("{endpoint}/json/version"))
            .send()
            .await?
            .json()
            .await?;
        let ws_url = version
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or(ConnectError::MissingWebSocketUrl)?
            .to_string();

        let (mut browser, handler) = Browser::connect(&ws_url).await?;
        let handler_task = tokio::spawn(handler_loop(handler));

        // Populate the target list so tabs opened before we attached show up.
        let _ = browser.fetch_targets().await;
        sleep(Duration::from_millis(100)).await;

        let browser = Arc::new(browser);
        let guarded = Arc::new(Mutex::new(TabGuard::default()));
        let dialog_task = tokio::spawn(guard_new_tabs(
            Arc::clone(&browser),
            Arc::clone(&guarded),
        ));

        Ok(Self {
            browser,
            guarded,
            handler_task,
            dialog_task,
        })
    }

    /// Resolve the page this command operates on, apply the fixed viewport
    /// and register the dialog auto-accept handler on it.
    pub async fn resolve_page(&mut self, request: &PageRequest) -> Result<Page, SessionError> {
        let page = match &request.url {
            Some(url) => self.open_fresh_page(url).await?,
            None => self.visible_page().await?,
        };

        apply_viewport(&page).await?;
        guard_page(&self.guarded, &page).await;
        Ok(page)
    }

    /// Close all existing tabs (best-effort, bounded), open a new tab and
    /// navigate it. Fails on a non-2xx document response.
    async fn open_fresh_page(&mut self, url: &str) -> Result<Page, SessionError> {
        let old_pages = self.browser.pages().await?;
        let page = self.browser.new_page("about:blank").await?;
        close_pages_best_effort(old_pages).await;

        let url = normalize_url(url);

        let mut responses = page.event_listener::<EventResponseReceived>().await?;
        page.execute(network::EnableParams::default()).await?;
        page.goto(url.clone()).await?;

        if let Some(response) = document_response(&mut responses, &url).await {
            if !(200..300).contains(&response.status) {
                return Err(SessionError::Navigation {
                    status: response.status,
                    url: response.url,
                });
            }
        }

        sleep(NAV_SETTLE).await;
        Ok(page)
    }

    /// The tab the user is actively looking at: first page whose document is
    /// not hidden/backgrounded.
    async fn visible_page(&mut self) -> Result<Page, SessionError> {
        let pages = self.browser.pages().await?;
        for page in pages {
            let visible = page
                .evaluate("document.visibilityState === 'visible'")
                .await
                .ok()
                .and_then(|res| res.into_value::<bool>().ok())
                .unwrap_or(false);
            if visible {
                return Ok(page);
            }
        }
        Err(SessionError::NoVisiblePage)
    }

    /// Close every open tab (best-effort, bounded by the same 2 s budget used
    /// before a fresh navigation).
    pub async fn close_all_pages(&mut self) -> Result<(), SessionError> {
        let pages = self.browser.pages().await?;
        let count = pages.len();
        close_pages_best_effort(pages).await;
        info!(count, "closed open tabs");
        Ok(())
    }

    /// Ask the browser process itself to exit. The one operation that does
    /// terminate Chrome; everything else only releases the connection.
    pub async fn close_browser(&mut self) -> Result<(), SessionError> {
        self.browser.execute(BrowserCloseParams::default()).await?;
        info!("browser shutdown requested");
        Ok(())
    }

    /// Release the connection; the browser process stays alive.
    pub fn disconnect(self) {
        self.handler_task.abort();
        self.dialog_task.abort();
        drop(self.browser);
        debug!("browser connection released");
    }
}

/// Acquire a page, run `action` against it, and always release the connection
/// afterwards, whether or not `action` fails. Generic over the caller's error
/// type; any `E` that absorbs [`SessionError`] works.
pub async fn with_active_page<T, E, F, Fut>(
    config: &SessionConfig,
    request: PageRequest,
    action: F,
) -> Result<T, E>
where
    E: From<SessionError>,
    F: FnOnce(Page) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut session = Session::connect(config).await.map_err(E::from)?;
    let result = match session.resolve_page(&request).await {
        Ok(page) => action(page).await,
        Err(err) => Err(E::from(err)),
    };
    session.disconnect();
    result
}

async fn handler_loop(mut handler: Handler) {
    while let Some(event) = handler.next().await {
        if event.is_err() {
            break;
        }
    }
}

/// Spawn Chrome detached with remote debugging on the configured port. The
/// child handle is dropped immediately so the process outlives this CLI.
fn spawn_detached_browser(config: &SessionConfig) -> Result<(), SessionError> {
    if config.executable.as_os_str().is_empty() {
        return Err(SessionError::ExecutableNotFound);
    }

    if let Err(err) = std::fs::create_dir_all(&config.user_data_dir) {
        warn!(%err, "failed to pre-create user-data dir");
    }

    let mut command = Command::new(&config.executable);
    command
        .arg(format!("--remote-debugging-port={}", config.debug_port))
        .arg(format!(
            "--user-data-dir={}",
            config.user_data_dir.display()
        ))
        .arg("--remote-allow-origins=*")
        .arg("--no-sandbox")
        .arg(format!("--window-size={VIEWPORT_WIDTH},{VIEWPORT_HEIGHT}"))
        .arg("--disable-blink-features=AutomationControlled")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if config.headless {
        command.arg("--headless=new");
    }

    let child = command.spawn().map_err(SessionError::Launch)?;
    info!(pid = child.id(), executable = %config.executable.display(), "launched detached browser");
    drop(child);
    Ok(())
}

async fn close_pages_best_effort(pages: Vec<Page>) {
    let closes = futures::future::join_all(pages.into_iter().map(|page| async move {
        // One stuck tab must not block the rest.
        if let Err(err) = page.execute(CloseParams::default()).await {
            debug!(%err, "failed to close tab");
        }
    }));
    if timeout(CLOSE_PAGES_BUDGET, closes).await.is_err() {
        warn!("tab close budget exhausted, proceeding anyway");
    }
}

async fn apply_viewport(page: &Page) -> Result<(), SessionError> {
    let params = SetDeviceMetricsOverrideParams::builder()
        .width(VIEWPORT_WIDTH as i64)
        .height(VIEWPORT_HEIGHT as i64)
        .device_scale_factor(1.0)
        .mobile(false)
        .build()
        .map_err(SessionError::Cdp)?;
    page.execute(params).await?;
    Ok(())
}

/// Tracks which tabs already carry the dialog auto-accept listener, so each
/// tab is wired up exactly once.
#[derive(Default)]
struct TabGuard {
    seen: HashSet<String>,
}

impl TabGuard {
    /// True the first time a target id is reported, false afterwards.
    fn first_sighting(&mut self, target_id: &str) -> bool {
        self.seen.insert(target_id.to_string())
    }
}

/// Attach the dialog auto-accept to `page` unless this tab is already
/// guarded.
async fn guard_page(guarded: &Mutex<TabGuard>, page: &Page) {
    let first = guarded
        .lock()
        .map(|mut guard| guard.first_sighting(page.target_id().inner().as_str()))
        .unwrap_or(false);
    if first {
        register_dialog_handler(page).await;
    }
}

/// Tabs can appear mid-command without the session opening them. Sweep the
/// target list and guard every tab as it shows up, so dialogs raised from a
/// popup cannot wedge the browser either.
async fn guard_new_tabs(browser: Arc<Browser>, guarded: Arc<Mutex<TabGuard>>) {
    loop {
        if let Ok(pages) = browser.pages().await {
            for page in pages {
                guard_page(&guarded, &page).await;
            }
        }
        sleep(DIALOG_SCAN_INTERVAL).await;
    }
}

/// Auto-accept `alert`/`confirm`/`prompt` so a native dialog never deadlocks
/// later automation against this page. Accept failures are non-fatal.
async fn register_dialog_handler(page: &Page) {
    let events = match page.event_listener::<EventJavascriptDialogOpening>().await {
        Ok(events) => events,
        Err(err) => {
            warn!(%err, "unable to watch for javascript dialogs");
            return;
        }
    };

    let dialog_page = page.clone();
    tokio::spawn(async move {
        let mut events = events;
        while let Some(dialog) = events.next().await {
            info!(kind = ?dialog.r#type, message = %dialog.message, "auto-accepting dialog");
            match HandleJavaScriptDialogParams::builder().accept(true).build() {
                Ok(params) => {
                    if let Err(err) = dialog_page.execute(params).await {
                        warn!(%err, "failed to accept dialog");
                    }
                }
                Err(err) => warn!(%err, "failed to build dialog accept command"),
            }
        }
    });
}

/// Wait briefly for the main document's network response after navigation.
/// `None` when no document response was observed (nothing to verify).
async fn document_response(
    responses: &mut (impl futures::Stream<Item = std::sync::Arc<EventResponseReceived>> + Unpin),
    url: &str,
) -> Option<DocumentResponse> {
    let deadline = tokio::time::Instant::now() + RESPONSE_GRACE;
    loop {
        let remaining = deadline.checked_duration_since(tokio::time::Instant::now())?;
        match timeout(remaining, responses.next()).await {
            Ok(Some(event)) if event.r#type == ResourceType::Document => {
                let matches = event.response.url == url
                    || event.response.url.trim_end_matches('/') == url.trim_end_matches('/');
                if matches {
                    return Some(DocumentResponse {
                        status: event.response.status,
                        url: event.response.url.clone(),
                    });
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) | Err(_) => return None,
        }
    }
}

struct DocumentResponse {
    status: i64,
    url: String,
}

/// Normalise a target URL: a missing scheme becomes `http://`.
pub fn normalize_url(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_missing_scheme() {
        assert_eq!(normalize_url("example.com"), "http://example.com");
        assert_eq!(normalize_url("localhost:8000/x"), "http://localhost:8000/x");
    }

    #[test]
    fn normalize_keeps_existing_scheme() {
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("HTTP://example.com"), "HTTP://example.com");
    }

    #[test]
    fn tab_guard_fires_once_per_target() {
        let mut guard = TabGuard::default();
        assert!(guard.first_sighting("tab-a"));
        assert!(!guard.first_sighting("tab-a"));
        assert!(guard.first_sighting("tab-b"));
    }

    #[test]
    fn page_request_constructors() {
        assert_eq!(
            PageRequest::navigate("example.com").url.as_deref(),
            Some("example.com")
        );
        assert!(PageRequest::active().url.is_none());
    }
}
