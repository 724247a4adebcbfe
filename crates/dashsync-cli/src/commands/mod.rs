//! CLI subcommands

pub mod config;
pub mod get;
pub mod list;
pub mod preview;
pub mod pull;
pub mod push;
pub mod rename;
pub mod status;
pub mod watch;
