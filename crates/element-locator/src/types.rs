//! Candidate element model returned by the in-page classifier.

use serde::{Deserialize, Serialize};

/// Viewport-coordinate bounding rectangle of a candidate element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Point a synthetic click should land on.
    pub fn center(&self) -> (f64, f64) {
        (
            self.left + (self.right - self.left) / 2.0,
            self.top + (self.bottom - self.top) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// One interactable element as seen by the classifier: ephemeral, produced
/// fresh on every pass, valid only against the live DOM it was read from.
///
/// Invariants upheld by the classifier script: `text` is never empty, and no
/// returned candidate is a DOM ancestor of another (innermost wins).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub rect: Rect,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_rect_midpoint() {
        let rect = Rect {
            left: 10.0,
            top: 20.0,
            right: 30.0,
            bottom: 60.0,
        };
        assert_eq!(rect.center(), (20.0, 40.0));
        assert_eq!(rect.width(), 20.0);
        assert_eq!(rect.height(), 40.0);
    }

    #[test]
    fn candidate_deserializes_from_classifier_shape() {
        let raw = r#"{"rect":{"left":1,"top":2,"right":3,"bottom":4},"text":"Submit"}"#;
        let candidate: Candidate = serde_json::from_str(raw).unwrap();
        assert_eq!(candidate.text, "Submit");
        assert_eq!(candidate.rect.left, 1.0);
    }
}
