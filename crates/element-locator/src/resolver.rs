//! Polling resolver: wait for a candidate matching the target text to appear,
//! then re-classify for fresh geometry and pick the match.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::errors::LocatorError;
use crate::port::ClassifierPort;
use crate::types::Candidate;

/// Delay between classifier passes while waiting for a match.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Total time a target may take to appear before the resolver gives up.
pub const POLL_WINDOW: Duration = Duration::from_secs(5);

/// Match rule: exact label equality wins, otherwise the first candidate whose
/// label contains `text` as a substring.
///
/// When several candidates carry identical labels the first in DOM traversal
/// order wins; that order is not guaranteed stable by the browser's query
/// API, so such ties are nondeterministic. Known limitation, left as is.
pub fn select_match<'a>(candidates: &'a [Candidate], text: &str) -> Option<&'a Candidate> {
    candidates
        .iter()
        .find(|candidate| candidate.text == text)
        .or_else(|| candidates.iter().find(|candidate| candidate.text.contains(text)))
}

/// Poll the classifier until a candidate matching `text` exists (scrolling it
/// into view), then classify once more and resolve the match against the
/// fresh rectangles, since the DOM may have shifted after scrolling.
pub async fn resolve_target(
    port: &dyn ClassifierPort,
    text: &str,
) -> Result<Candidate, LocatorError> {
    let started = Instant::now();
    let mut found = false;
    while started.elapsed() < POLL_WINDOW {
        if port.scroll_into_view(text).await? {
            found = true;
            break;
        }
        sleep(POLL_INTERVAL).await;
    }

    if !found {
        debug!(text, "polling window elapsed without a match");
        return Err(LocatorError::Timeout {
            text: text.to_string(),
            window_ms: POLL_WINDOW.as_millis() as u64,
        });
    }

    let candidates = port.classify().await?;
    select_match(&candidates, text)
        .cloned()
        .ok_or_else(|| LocatorError::NotFound {
            text: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn candidate(text: &str, left: f64) -> Candidate {
        Candidate {
            rect: Rect {
                left,
                top: 0.0,
                right: left + 10.0,
                bottom: 10.0,
            },
            text: text.to_string(),
        }
    }

    /// Scripted classifier: `appear_after` scroll passes fail before a match
    /// is reported.
    struct FakeClassifier {
        appear_after: usize,
        calls: AtomicUsize,
        candidates: Vec<Candidate>,
    }

    impl FakeClassifier {
        fn new(appear_after: usize, candidates: Vec<Candidate>) -> Self {
            Self {
                appear_after,
                calls: AtomicUsize::new(0),
                candidates,
            }
        }
    }

    #[async_trait]
    impl ClassifierPort for FakeClassifier {
        async fn scroll_into_view(&self, text: &str) -> Result<bool, LocatorError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(call >= self.appear_after && select_match(&self.candidates, text).is_some())
        }

        async fn classify(&self) -> Result<Vec<Candidate>, LocatorError> {
            Ok(self.candidates.clone())
        }
    }

    #[test]
    fn exact_match_beats_substring() {
        let candidates = vec![candidate("Submit form", 0.0), candidate("Submit", 100.0)];
        let chosen = select_match(&candidates, "Submit").unwrap();
        assert_eq!(chosen.rect.left, 100.0);
    }

    #[test]
    fn substring_falls_back_to_first_in_order() {
        let candidates = vec![candidate("Open settings", 0.0), candidate("More settings", 50.0)];
        let chosen = select_match(&candidates, "settings").unwrap();
        assert_eq!(chosen.rect.left, 0.0);
    }

    #[test]
    fn no_match_returns_none() {
        let candidates = vec![candidate("Cancel", 0.0)];
        assert!(select_match(&candidates, "Submit").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_after_element_appears() {
        let port = FakeClassifier::new(3, vec![candidate("Submit", 20.0)]);
        let resolved = resolve_target(&port, "Submit").await.unwrap();
        assert_eq!(resolved.text, "Submit");
        assert_eq!(resolved.rect.left, 20.0);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_when_target_never_appears() {
        let port = FakeClassifier::new(0, vec![candidate("Cancel", 0.0)]);
        let err = resolve_target(&port, "Submit").await.unwrap_err();
        assert!(matches!(err, LocatorError::Timeout { .. }));
        // Polling must stop at the window, never hang.
        assert!(port.calls.load(Ordering::SeqCst) <= 11);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_when_match_vanishes_after_scroll() {
        /// Reports a match during polling but returns an unrelated candidate
        /// set from the fresh classification pass.
        struct VanishingClassifier;

        #[async_trait]
        impl ClassifierPort for VanishingClassifier {
            async fn scroll_into_view(&self, _text: &str) -> Result<bool, LocatorError> {
                Ok(true)
            }

            async fn classify(&self) -> Result<Vec<Candidate>, LocatorError> {
                Ok(vec![candidate("Cancel", 0.0)])
            }
        }

        let err = resolve_target(&VanishingClassifier, "Submit").await.unwrap_err();
        assert!(matches!(err, LocatorError::NotFound { .. }));
    }
}
