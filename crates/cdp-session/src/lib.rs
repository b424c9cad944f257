//! Browser session handle: attach to a running Chrome over the DevTools
//! protocol, or launch a detached instance and retry, then resolve the page a
//! command should operate on.
//!
//! The connection is released (never closed) after every command so the
//! browser process and its profile outlive the CLI invocation.

pub mod config;
pub mod error;
pub mod session;

pub use config::SessionConfig;
pub use error::{ConnectError, SessionError};
pub use session::{with_active_page, PageRequest, Session};
