//! In-process tool discovery across configured MCP servers.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use toolgate_core::{
    ServerDefinition, ServerTools, ToolConfig, ToolDescriptor, ToolDiscoveryPort, TransportError,
    TransportType,
};

use crate::client::{McpClient, McpClientError};

/// Default time allowed for one server to start and list its tools.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Name sent as `clientInfo.name` during the handshake.
pub const DEFAULT_CLIENT_NAME: &str = "toolgate";

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Upper bound for one server's spawn + handshake + listing.
    pub probe_timeout: Duration,
    pub client_name: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
        }
    }
}

impl DiscoveryConfig {
    #[must_use]
    pub const fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }
}

/// Discovers tools by briefly starting each configured server.
///
/// The most recently applied configuration is kept so that
/// [`ToolDiscoveryPort::availability`] can re-probe it.
pub struct McpDiscoveryService {
    config: DiscoveryConfig,
    active: RwLock<ToolConfig>,
}

impl McpDiscoveryService {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            config,
            active: RwLock::new(ToolConfig::new()),
        }
    }

    /// The configuration most recently passed to `discover`.
    pub fn active_config(&self) -> ToolConfig {
        self.active
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    async fn probe_all(&self, config: &ToolConfig) -> ServerTools {
        let probes = config.iter().map(|(name, definition)| async move {
            match self.probe(definition).await {
                Ok(tools) => {
                    debug!(server = %name, tools = tools.len(), "Tool server available");
                    Some((name.clone(), tools))
                }
                Err(e) => {
                    warn!(server = %name, error = %e, "Tool server unavailable");
                    None
                }
            }
        });

        let tools: ServerTools = join_all(probes).await.into_iter().flatten().collect();
        info!(
            configured = config.len(),
            available = tools.len(),
            tools = tools.tool_count(),
            "Tool discovery finished"
        );
        tools
    }

    async fn probe(&self, definition: &ServerDefinition) -> Result<Vec<ToolDescriptor>, McpClientError> {
        if definition.transport_type == TransportType::Sse {
            return Err(McpClientError::ProtocolError(
                "SSE transport is not supported for discovery".to_string(),
            ));
        }

        let mut client = McpClient::new(&self.config.client_name, self.config.probe_timeout);
        let result = timeout(self.config.probe_timeout, async {
            client.connect_stdio(definition).await?;
            client.list_tools().await
        })
        .await;
        client.disconnect();

        result.unwrap_or(Err(McpClientError::Timeout))
    }
}

#[async_trait]
impl ToolDiscoveryPort for McpDiscoveryService {
    async fn discover(&self, config: &ToolConfig) -> Result<ServerTools, TransportError> {
        config.validate().map_err(TransportError::Rejected)?;

        *self
            .active
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = config.clone();

        Ok(self.probe_all(config).await)
    }

    async fn availability(&self) -> Result<ServerTools, TransportError> {
        let config = self.active_config();
        if config.is_empty() {
            return Ok(ServerTools::new());
        }
        Ok(self.probe_all(&config).await)
    }
}
