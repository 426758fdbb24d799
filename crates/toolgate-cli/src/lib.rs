//! `toolgate` command-line interface.
//!
//! `toolgate serve` runs the HTTP gateway; the remaining commands are
//! clients of a running gateway and keep their settings in a local
//! `SQLite` database.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by the binary target only.
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod config_commands;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliConfig, CliContext, bootstrap, server_config};
pub use commands::{Commands, ServeArgs};
pub use config_commands::ConfigCommand;
pub use parser::Cli;
