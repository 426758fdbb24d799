//! Install/auth/identity status derived from gateway calls.

use std::sync::Arc;

use tracing::debug;

use toolgate_core::{CliStatus, ExecRequest};

use crate::gateway::ExecutionGateway;

/// Derives a [`CliStatus`] from `version` and `auth status`.
///
/// Stateless: every call runs the commands again.
#[derive(Clone)]
pub struct StatusAggregator {
    gateway: Arc<ExecutionGateway>,
}

impl StatusAggregator {
    pub const fn new(gateway: Arc<ExecutionGateway>) -> Self {
        Self { gateway }
    }

    pub async fn get_status(&self) -> CliStatus {
        let version = self.gateway.execute(ExecRequest::new("version")).await;
        if !version.success {
            debug!(error = ?version.error, "CLI not installed");
            return CliStatus::not_installed(version.failure_text());
        }

        let auth = self.gateway.execute(ExecRequest::new("auth status")).await;
        if auth.success {
            CliStatus::authenticated(version.version, auth.identity)
        } else {
            debug!(error = ?auth.error, "CLI installed but not authenticated");
            CliStatus::unauthenticated(version.version)
        }
    }
}
