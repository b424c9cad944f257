//! Session-level error taxonomy. Every kind is fatal for the invoking
//! command except `NoVisiblePage`, which callers may treat as a recoverable
//! "nothing to act on" condition.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Browser unreachable after the launch-and-retry sequence.
    #[error("unable to connect to browser at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: ConnectError,
    },

    /// Chrome executable missing and no running browser to attach to.
    #[error("no Chrome/Chromium executable found; set BROWSERCLI_CHROME")]
    ExecutableNotFound,

    #[error("failed to spawn browser process: {0}")]
    Launch(#[source] std::io::Error),

    /// Non-2xx document response on navigation.
    #[error("failed to load page: {status} {url}")]
    Navigation { status: i64, url: String },

    /// No open tab is currently visible to the user.
    #[error("no visible page found")]
    NoVisiblePage,

    #[error("cdp i/o failure: {0}")]
    Cdp(String),
}

impl From<chromiumoxide::error::CdpError> for SessionError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        SessionError::Cdp(err.to_string())
    }
}

/// Why a single attach attempt failed.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("debugging endpoint request failed: {0}")]
    Endpoint(#[from] reqwest::Error),

    #[error("endpoint returned no webSocketDebuggerUrl")]
    MissingWebSocketUrl,

    #[error("websocket connect failed: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("no connection attempt succeeded")]
    Exhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_error_reports_endpoint_and_cause() {
        let err = SessionError::Connect {
            endpoint: "http://127.0.0.1:21222".to_string(),
            source: ConnectError::Exhausted,
        };
        let msg = err.to_string();
        assert!(msg.contains("http://127.0.0.1:21222"));
        assert!(msg.contains("no connection attempt succeeded"));
    }
}
