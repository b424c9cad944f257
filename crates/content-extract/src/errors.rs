use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("page evaluation failed: {0}")]
    Eval(String),

    #[error("markdown conversion failed: {0}")]
    Markdown(String),
}

impl From<chromiumoxide::error::CdpError> for ExtractError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ExtractError::Eval(err.to_string())
    }
}
