//! Locator error taxonomy. `Timeout` and `NotFound` are distinct so callers
//! can tell "never appeared within the polling window" from "current DOM has
//! candidates but none match".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocatorError {
    /// Polling window elapsed without any candidate matching the target text.
    #[error("unable to find clickable element with text \"{text}\" within {window_ms}ms")]
    Timeout { text: String, window_ms: u64 },

    /// A fresh classification pass ran, but no candidate matches.
    #[error("unable to find clickable element with text \"{text}\"")]
    NotFound { text: String },

    /// The in-page evaluation itself failed.
    #[error("classifier evaluation failed: {0}")]
    Eval(String),
}

impl From<chromiumoxide::error::CdpError> for LocatorError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        LocatorError::Eval(err.to_string())
    }
}
