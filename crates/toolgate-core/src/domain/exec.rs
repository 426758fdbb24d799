//! Gateway request/response contract.
//!
//! Both a rejected command and a failed process are represented as an
//! `ExecResponse` with `success == false`; neither is an error at the
//! transport level.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CliIdentity;

/// A request to run one allowlisted CLI command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecRequest {
    /// Command verb, possibly compound (e.g. "auth status").
    pub command: String,

    /// Additional arguments appended after the verb.
    #[serde(default)]
    pub args: Vec<String>,

    /// Environment overrides layered on top of the ambient environment.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Working-directory override; the platform default is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

impl ExecRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// The command line echoed back in responses: verb followed by arguments.
    pub fn display_command(&self) -> String {
        display_command(&self.command, &self.args)
    }
}

/// Join a verb and its arguments into the echoed command string.
pub(crate) fn display_command(command: &str, args: &[String]) -> String {
    let mut line = command.trim().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Result of a gateway execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecResponse {
    /// Whether the command was allowed and exited successfully.
    pub success: bool,

    /// Echo of the executed command line.
    pub command: String,

    /// Captured output (trimmed). May hold partial output on failure.
    pub output: String,

    /// Failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Parsed tool version (only for `version`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Authenticated identity (only for `auth status`, when the chained lookup succeeded).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<CliIdentity>,
}

impl ExecResponse {
    /// A successful execution.
    pub fn succeeded(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            success: true,
            command: command.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    /// A failed execution, keeping whatever output was captured.
    pub fn failed(
        command: impl Into<String>,
        output: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            command: command.into(),
            output: output.into(),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// A command refused before anything was spawned.
    pub fn rejected(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::failed(command, String::new(), reason)
    }

    /// Failure text suitable for display: the error, else the output.
    pub fn failure_text(&self) -> String {
        self.error
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| self.output.clone())
    }
}
