//! `toolgate serve`: run the HTTP gateway in this process.

use anyhow::Result;
use tracing::info;

use crate::bootstrap::server_config;
use crate::commands::ServeArgs;

pub async fn execute(args: &ServeArgs) -> Result<()> {
    let config = server_config(args);
    info!(
        host = %config.host,
        port = config.port,
        executable = %config.gateway.target().executable.display(),
        "Starting gateway"
    );
    toolgate_axum::start_server(config).await
}
