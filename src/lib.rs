//! Command-line driver for the browser controller: argument parsing, logging
//! setup, and thin handlers that compose the session, locator, action and
//! extraction crates.

pub mod cli;
