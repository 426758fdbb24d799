//! Root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;
use toolgate_client::DEFAULT_GATEWAY_URL;

use crate::commands::Commands;

/// Command-line interface for the toolgate gateway.
#[derive(Parser)]
#[command(name = "toolgate")]
#[command(about = "Run and talk to a GitHub CLI / MCP tool gateway")]
#[command(version)]
pub struct Cli {
    /// Base URL of the gateway used by client commands
    #[arg(long, env = "TOOLGATE_URL", default_value = DEFAULT_GATEWAY_URL, global = true)]
    pub url: String,

    /// Override the data directory holding the settings database
    #[arg(long = "data-dir", env = "TOOLGATE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
