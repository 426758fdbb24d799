//! Axum server bootstrap - the composition root.
//!
//! This module is the only place where the gateway's infrastructure is
//! wired together for the web adapter.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use toolgate_core::ToolDiscoveryPort;
use toolgate_mcp::{DiscoveryConfig, McpDiscoveryService};
use toolgate_runtime::{ExecutionGateway, GatewayConfig, StatusAggregator};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 9878;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
    pub gateway: GatewayConfig,
    pub discovery: DiscoveryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ServerConfig {
    pub fn with_defaults() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            cors: CorsConfig::default(),
            gateway: GatewayConfig::with_defaults(),
            discovery: DiscoveryConfig::default(),
        }
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Services the handlers run against.
pub struct AxumContext {
    pub gateway: Arc<ExecutionGateway>,
    pub status: StatusAggregator,
    pub discovery: Arc<dyn ToolDiscoveryPort>,
}

impl AxumContext {
    pub fn new(gateway: Arc<ExecutionGateway>, discovery: Arc<dyn ToolDiscoveryPort>) -> Self {
        Self {
            status: StatusAggregator::new(Arc::clone(&gateway)),
            gateway,
            discovery,
        }
    }
}

/// Build the gateway services. The platform target is resolved here, once.
pub fn bootstrap(config: &ServerConfig) -> AxumContext {
    let gateway = Arc::new(ExecutionGateway::new(&config.gateway));
    let discovery = Arc::new(McpDiscoveryService::new(config.discovery.clone()));

    info!(
        platform = %config.gateway.platform,
        max_concurrent = config.gateway.max_concurrent,
        timeout_secs = config.gateway.timeout.as_secs(),
        probe_timeout_secs = config.discovery.probe_timeout.as_secs(),
        "Gateway bootstrapped"
    );

    AxumContext::new(gateway, discovery)
}

/// Serve the API on an already-bound listener until the future completes.
pub async fn serve(listener: TcpListener, ctx: AxumContext, cors: &CorsConfig) -> Result<()> {
    let app = crate::routes::create_router(ctx, cors);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the web server and run until Ctrl-C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let ctx = bootstrap(&config);
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("toolgate gateway listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("toolgate gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
