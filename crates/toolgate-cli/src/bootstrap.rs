//! CLI bootstrap - the composition root.
//!
//! Client commands get a [`CliContext`]: a gateway client plus a local
//! `ConfigStore` whose settings live in the `SQLite` database and whose
//! discovery calls go to the gateway. `serve` builds a [`ServerConfig`]
//! instead and hands it to the axum adapter.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use toolgate_axum::ServerConfig;
use toolgate_client::{ClientConfig, GatewayClient};
use toolgate_core::{ConfigStore, Platform, database_path};
use toolgate_db::{SqliteSettingsRepository, setup_database};
use toolgate_mcp::DiscoveryConfig;
use toolgate_runtime::GatewayConfig;

use crate::commands::ServeArgs;

/// Bootstrap configuration for client commands.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Gateway base URL.
    pub url: String,
    /// Explicit data directory; falls back to the platform default.
    pub data_dir: Option<PathBuf>,
}

/// Composed dependencies for client commands.
pub struct CliContext {
    pub client: GatewayClient,
    pub store: ConfigStore,
    pub database: PathBuf,
}

/// Wire the gateway client and the settings store.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let database = database_path(config.data_dir.as_deref())?;
    let pool = setup_database(&database).await?;
    let client = GatewayClient::new(ClientConfig::new(config.url))?;

    let store = ConfigStore::new(
        Arc::new(SqliteSettingsRepository::new(pool)),
        Arc::new(client.clone()),
    );
    debug!(database = %database.display(), url = %client.config().base_url(), "CLI bootstrapped");

    Ok(CliContext {
        client,
        store,
        database,
    })
}

/// Translate `serve` flags into the axum adapter's configuration.
pub fn server_config(args: &ServeArgs) -> ServerConfig {
    let mut gateway = GatewayConfig::with_defaults()
        .with_max_concurrent(args.max_concurrent)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    if let Some(platform) = args.platform.as_deref() {
        gateway = gateway.with_platform(parse_platform(platform));
    }
    if let Some(path) = args.gh_path.as_deref() {
        gateway = gateway.with_executable(path);
    }

    let mut config = ServerConfig {
        host: args.host.clone(),
        port: args.port,
        gateway,
        discovery: DiscoveryConfig::default()
            .with_probe_timeout(Duration::from_secs(args.discovery_timeout_secs)),
        ..ServerConfig::with_defaults()
    };
    if !args.allow_origins.is_empty() {
        config = config.with_allowed_origins(args.allow_origins.clone());
    }
    config
}

fn parse_platform(raw: &str) -> Platform {
    raw.parse().unwrap_or_else(|never| match never {})
}
