use element_locator::LocatorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error("input dispatch failed: {0}")]
    Input(String),
}

impl From<chromiumoxide::error::CdpError> for ActionError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ActionError::Input(err.to_string())
    }
}
