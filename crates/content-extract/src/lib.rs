//! Content extraction: plain text and Markdown from the page's main content
//! element, the most-direct-children scrape heuristic, and an indented
//! outline of the accessibility tree.

pub mod aria;
pub mod errors;
pub mod markdown;
pub mod scrape;

pub use aria::aria_snapshot;
pub use errors::ExtractError;
pub use markdown::{get_markdown, get_text};
pub use scrape::{apply_filters, scrape, ScrapeItem};
