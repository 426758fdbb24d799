//! Test doubles shared by the router tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use toolgate_axum::AxumContext;
use toolgate_core::{
    CommandInvocation, CommandRunner, ExecResponse, PlatformTarget, ServerTools, ToolConfig,
    ToolDescriptor, ToolDiscoveryPort, TransportError,
};
use toolgate_runtime::ExecutionGateway;

/// Answers from a fixed table keyed by the argv line; anything else fails.
#[derive(Default)]
pub struct FakeCli {
    responses: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeCli {
    pub fn with(mut self, argv: &str, output: &str) -> Self {
        self.responses.insert(argv.to_string(), output.to_string());
        self
    }

    /// An installed, logged-in CLI.
    pub fn logged_in() -> Self {
        Self::default()
            .with("version", "gh version 2.40.0 (2023-01-01)")
            .with("auth status", "Logged in to github.com as alice")
            .with("api user", r#"{"login":"alice","name":"Alice A"}"#)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CommandRunner for FakeCli {
    async fn run(&self, invocation: CommandInvocation) -> ExecResponse {
        let line = invocation.argv().join(" ");
        self.calls.lock().unwrap().push(line.clone());
        match self.responses.get(&line) {
            Some(output) => ExecResponse::succeeded(invocation.display_command(), output.clone()),
            None => ExecResponse::failed(invocation.display_command(), "", "exited with status 1"),
        }
    }
}

/// Discovery that reports one `ping` tool per configured stdio server and
/// refuses configurations that fail validation.
#[derive(Default)]
pub struct StubDiscovery {
    active: Mutex<ToolConfig>,
}

impl StubDiscovery {
    fn tools_for(config: &ToolConfig) -> ServerTools {
        config
            .iter()
            .map(|(name, _)| (name.clone(), vec![ToolDescriptor::new("ping")]))
            .collect()
    }
}

#[async_trait]
impl ToolDiscoveryPort for StubDiscovery {
    async fn discover(&self, config: &ToolConfig) -> Result<ServerTools, TransportError> {
        config.validate().map_err(TransportError::Rejected)?;
        *self.active.lock().unwrap() = config.clone();
        Ok(Self::tools_for(config))
    }

    async fn availability(&self) -> Result<ServerTools, TransportError> {
        Ok(Self::tools_for(&self.active.lock().unwrap()))
    }
}

pub fn context(cli: Arc<FakeCli>) -> AxumContext {
    let gateway = ExecutionGateway::with_runner(cli, PlatformTarget::new("/usr/bin/gh", "/tmp"));
    AxumContext::new(Arc::new(gateway), Arc::new(StubDiscovery::default()))
}
