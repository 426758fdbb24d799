//! Command runner trait definition.
//!
//! This port runs one already-validated CLI invocation. Implementations own
//! all process details (spawning, pipes, timeouts, concurrency limits) and
//! perform no allowlist or platform logic.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::ExecResponse;

/// A fully resolved invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Executable to run.
    pub executable: PathBuf,
    /// Working directory for the child.
    pub working_dir: PathBuf,
    /// Command verb; split on whitespace into leading argv entries.
    pub command: String,
    /// Arguments after the verb.
    pub args: Vec<String>,
    /// Overrides layered on the ambient environment (overrides win).
    pub env: BTreeMap<String, String>,
}

impl CommandInvocation {
    /// Full argument vector passed to the executable.
    pub fn argv(&self) -> Vec<String> {
        self.command
            .split_whitespace()
            .map(str::to_string)
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Command line echoed back in the response.
    pub fn display_command(&self) -> String {
        crate::domain::exec::display_command(&self.command, &self.args)
    }
}

/// Runs CLI invocations.
///
/// # Design Rules
///
/// - Never fails: spawn errors, non-zero exits and timeouts all come back as
///   an `ExecResponse` with `success == false`
/// - No HTTP or allowlist concerns in signatures
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the invocation to completion and capture its output.
    async fn run(&self, invocation: CommandInvocation) -> ExecResponse;
}
