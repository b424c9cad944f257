//! Action primitives: click a text target, type into the focused element,
//! press key combinations, auto-scroll, and dump the classifier's view.
//!
//! Clicks go through the synthetic input path (mouse events at a computed
//! coordinate) rather than DOM-level `.click()`, so hover and focus side
//! effects fire the same way they would for a real user.

pub mod actions;
pub mod errors;
pub mod keys;

pub use actions::{click, dump, press_key, scroll_to_bottom, type_text};
pub use errors::ActionError;
pub use keys::parse_key_combo;
