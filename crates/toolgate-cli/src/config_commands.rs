//! Settings subcommands.

use clap::Subcommand;

use crate::commands::parse_key_value;

/// Settings management commands.
///
/// Changes go through the local `ConfigStore`, which asks the gateway to
/// discover tools before anything is persisted.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the stored settings and the tools discovered for them
    Show,
    /// Set the maximum number of agent steps
    SetMaxSteps {
        /// New limit (1-1000)
        max_steps: u32,
    },
    /// Add or replace a tool server
    AddServer {
        /// Unique server name
        name: String,
        /// Executable to launch (stdio transport)
        #[arg(long, required_unless_present = "sse_url", conflicts_with = "sse_url")]
        command: Option<String>,
        /// Argument passed to the executable (repeatable)
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,
        /// Environment variable for the server process (KEY=VALUE, repeatable)
        #[arg(long = "env", value_parser = parse_key_value)]
        env: Vec<(String, String)>,
        /// Working directory for the server process
        #[arg(long)]
        cwd: Option<String>,
        /// Endpoint of an SSE server instead of a local executable
        #[arg(long = "sse-url")]
        sse_url: Option<String>,
    },
    /// Remove a tool server
    RemoveServer {
        /// Name of the server to remove
        name: String,
    },
}
