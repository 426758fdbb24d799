//! Tokio-backed [`CommandRunner`].

use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use toolgate_core::{CommandInvocation, CommandRunner, ExecResponse};

use crate::config::GatewayConfig;

/// Runs invocations as child processes.
///
/// A semaphore bounds how many children exist at once, and each child is
/// killed if it outlives the timeout.
#[derive(Debug, Clone)]
pub struct TokioCommandRunner {
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl TokioCommandRunner {
    pub fn new(max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.max_concurrent, config.timeout)
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: CommandInvocation) -> ExecResponse {
        let command_line = invocation.display_command();

        let Ok(_permit) = self.permits.acquire().await else {
            return ExecResponse::failed(command_line, "", "command runner is shut down");
        };

        let mut cmd = Command::new(&invocation.executable);
        cmd.args(invocation.argv())
            .current_dir(&invocation.working_dir)
            .envs(&invocation.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(
                    executable = %invocation.executable.display(),
                    error = %e,
                    "Failed to spawn command"
                );
                return ExecResponse::failed(
                    command_line,
                    "",
                    format!(
                        "failed to start {}: {e}",
                        invocation.executable.display()
                    ),
                );
            }
        };

        // Dropping the wait future on timeout drops the child, which kills it.
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => interpret_output(command_line, &output),
            Ok(Err(e)) => ExecResponse::failed(command_line, "", format!("failed to collect output: {e}")),
            Err(_) => {
                let limit = describe_timeout(self.timeout);
                warn!(command = %command_line, timeout = %limit, "Command timed out");
                ExecResponse::failed(command_line, "", format!("timed out after {limit}"))
            }
        }
    }
}

fn interpret_output(command_line: String, output: &Output) -> ExecResponse {
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if output.status.success() {
        // Some commands (e.g. `auth status`) report on stderr.
        let text = if stdout.is_empty() { stderr } else { stdout };
        return ExecResponse::succeeded(command_line, text);
    }

    debug!(command = %command_line, status = ?output.status.code(), "Command exited unsuccessfully");
    let error = if stderr.is_empty() {
        match output.status.code() {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        }
    } else {
        stderr
    };
    ExecResponse::failed(command_line, stdout, error)
}

/// Whole seconds print as `N s`, anything finer as `N ms`.
fn describe_timeout(timeout: Duration) -> String {
    if timeout.subsec_nanos() == 0 {
        format!("{} s", timeout.as_secs())
    } else {
        format!("{} ms", timeout.as_millis())
    }
}
