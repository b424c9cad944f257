//! Boundary between the controller process and the page's JavaScript
//! context, modelled as a narrow remote-procedure trait so the resolver can
//! be exercised against a fake page in tests.

use async_trait::async_trait;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use serde_json::json;
use tracing::debug;

use crate::errors::LocatorError;
use crate::script::classifier_expression;
use crate::types::Candidate;

#[async_trait]
pub trait ClassifierPort: Send + Sync {
    /// Run the classifier and, if a candidate matches `text`, scroll it into
    /// view. Returns whether a match exists in the current DOM.
    async fn scroll_into_view(&self, text: &str) -> Result<bool, LocatorError>;

    /// Run the classifier and return every current candidate with fresh
    /// bounding rectangles.
    async fn classify(&self) -> Result<Vec<Candidate>, LocatorError>;
}

/// Classifier port backed by a live CDP page.
pub struct PageClassifier {
    page: Page,
}

impl PageClassifier {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(
        &self,
        args: serde_json::Value,
    ) -> Result<T, LocatorError> {
        let params = EvaluateParams::builder()
            .expression(classifier_expression(&args))
            .return_by_value(true)
            .build()
            .map_err(LocatorError::Eval)?;
        let result = self.page.evaluate(params).await?;
        result
            .into_value::<T>()
            .map_err(|err| LocatorError::Eval(err.to_string()))
    }
}

#[async_trait]
impl ClassifierPort for PageClassifier {
    async fn scroll_into_view(&self, text: &str) -> Result<bool, LocatorError> {
        let found = self
            .evaluate::<bool>(json!({ "op": "scrollIntoView", "text": text }))
            .await?;
        debug!(text, found, "scroll-into-view pass");
        Ok(found)
    }

    async fn classify(&self) -> Result<Vec<Candidate>, LocatorError> {
        let candidates = self
            .evaluate::<Vec<Candidate>>(json!({ "op": "classify", "text": "" }))
            .await?;
        debug!(count = candidates.len(), "classified interactable elements");
        Ok(candidates)
    }
}
