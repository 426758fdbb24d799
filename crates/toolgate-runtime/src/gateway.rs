//! Execution gateway: validate, resolve, run, post-process.

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use std::time::Instant;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use toolgate_core::{
    CliIdentity, CommandInvocation, CommandRunner, ExecRequest, ExecResponse, PlatformTarget,
};

use crate::config::GatewayConfig;
use crate::runner::TokioCommandRunner;
use crate::validator::CommandValidator;

/// `<tool> version <token>`, e.g. `gh version 2.40.0 (2023-01-01)`.
static VERSION_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\S+\s+version\s+v?(\S+)").ok());

/// Runs allowlisted CLI commands against the resolved platform target.
pub struct ExecutionGateway {
    runner: Arc<dyn CommandRunner>,
    validator: CommandValidator,
    target: PlatformTarget,
}

impl ExecutionGateway {
    /// Build a gateway backed by a [`TokioCommandRunner`].
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_runner(
            Arc::new(TokioCommandRunner::from_config(config)),
            config.target(),
        )
    }

    /// Build a gateway around any runner.
    pub fn with_runner(runner: Arc<dyn CommandRunner>, target: PlatformTarget) -> Self {
        info!(
            executable = %target.executable.display(),
            working_dir = %target.working_dir.display(),
            "Execution gateway target resolved"
        );
        Self {
            runner,
            validator: CommandValidator::default(),
            target,
        }
    }

    #[must_use]
    pub fn with_validator(mut self, validator: CommandValidator) -> Self {
        self.validator = validator;
        self
    }

    /// The executable and default working directory in use.
    pub const fn target(&self) -> &PlatformTarget {
        &self.target
    }

    /// Execute one request.
    ///
    /// Never fails: rejections and process failures come back with
    /// `success == false`.
    pub async fn execute(&self, request: ExecRequest) -> ExecResponse {
        let validation = self.validator.validate(&request.command);
        if !validation.allowed {
            let reason = validation
                .reason
                .unwrap_or_else(|| "Command not allowed".to_string());
            warn!(command = %request.command, %reason, "Rejected command");
            return ExecResponse::rejected(request.display_command(), reason);
        }

        let verb = request.command.trim().to_ascii_lowercase();
        let wants_identity = is_auth_status(&verb, &request.args);

        let invocation = self.invocation(&request);
        let started = Instant::now();
        let mut response = self.runner.run(invocation.clone()).await;
        info!(
            command = %response.command,
            success = response.success,
            duration_ms = started.elapsed().as_millis(),
            "Executed command"
        );

        if verb == "version" {
            response.version = parse_version(&response.output);
        } else if wants_identity && response.success {
            response.identity = self.fetch_identity(&invocation).await;
        }

        response
    }

    fn invocation(&self, request: &ExecRequest) -> CommandInvocation {
        let working_dir = request
            .cwd
            .as_ref()
            .map_or_else(|| self.target.working_dir.clone(), PathBuf::from);

        CommandInvocation {
            executable: self.target.executable.clone(),
            working_dir,
            command: request.command.trim().to_string(),
            args: request.args.clone(),
            env: request.env.clone(),
        }
    }

    /// Follow-up `api user` call sharing the environment and working dir of
    /// the `auth status` call. Any failure just means "no identity".
    async fn fetch_identity(&self, auth: &CommandInvocation) -> Option<CliIdentity> {
        let invocation = CommandInvocation {
            command: "api".to_string(),
            args: vec!["user".to_string()],
            ..auth.clone()
        };

        let response = self.runner.run(invocation).await;
        if !response.success {
            debug!(error = ?response.error, "Identity lookup failed");
            return None;
        }

        let identity = parse_identity(&response.output);
        if identity.is_none() {
            debug!("Identity lookup returned unparseable output");
        }
        identity
    }
}

fn is_auth_status(verb: &str, args: &[String]) -> bool {
    let mut words = verb.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("auth"), Some("status"), None) => true,
        (Some("auth"), None, None) => args
            .first()
            .is_some_and(|arg| arg.eq_ignore_ascii_case("status")),
        _ => false,
    }
}

fn parse_version(output: &str) -> Option<String> {
    let pattern = VERSION_PATTERN.as_ref()?;
    pattern
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Deserialize)]
struct ApiUser {
    login: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

fn parse_identity(output: &str) -> Option<CliIdentity> {
    let user: ApiUser = serde_json::from_str(output).ok()?;
    if user.login.is_empty() {
        return None;
    }

    let display_name = user
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| user.login.clone());

    Some(CliIdentity {
        login: user.login,
        display_name,
        email: user.email.filter(|email| !email.is_empty()),
    })
}
