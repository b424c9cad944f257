pub mod actions;
pub mod app;
pub mod commands;
pub mod content;
pub mod debug;
pub mod dispatch;
pub mod env;
pub mod runtime;
pub mod session_cmds;

pub use app::run;
