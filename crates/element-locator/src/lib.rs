//! Element classification and text-target resolution.
//!
//! The classifier itself runs inside the page's JavaScript context (plain
//! JSON in, plain JSON out); this crate owns that script, the candidate data
//! model it returns, and the polling resolver that waits for a matching
//! element to appear.

pub mod errors;
pub mod port;
pub mod resolver;
pub mod script;
pub mod types;

pub use errors::LocatorError;
pub use port::{ClassifierPort, PageClassifier};
pub use resolver::{resolve_target, select_match, POLL_INTERVAL, POLL_WINDOW};
pub use types::{Candidate, Rect};
