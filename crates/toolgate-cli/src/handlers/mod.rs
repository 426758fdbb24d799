//! Command handlers.
//!
//! Handlers are thin: they call the gateway client or the settings store
//! and print the result as JSON.

pub mod config;
pub mod gateway;
pub mod serve;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::bootstrap::CliContext;
use crate::commands::Commands;

/// Route a client command to its handler.
pub async fn dispatch(ctx: &CliContext, command: Commands) -> Result<()> {
    match command {
        Commands::Serve(_) => bail!("`serve` runs the gateway and takes no client context"),
        Commands::Status => gateway::status(ctx).await,
        Commands::Exec {
            command,
            args,
            env,
            cwd,
        } => gateway::exec(ctx, command, args, env, cwd).await,
        Commands::Config { command } => config::execute(ctx, command).await,
        Commands::Availability => gateway::availability(ctx).await,
    }
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
