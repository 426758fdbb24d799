//! Tool-server discovery handlers.

use axum::Json;
use axum::extract::State;

use crate::error::HttpError;
use crate::state::AppState;
use toolgate_core::{ServerTools, ToolConfig};

/// Apply a configuration and return the tools each reachable server exposes.
///
/// Persisting the configuration is the caller's responsibility.
pub async fn apply_config(
    State(state): State<AppState>,
    Json(config): Json<ToolConfig>,
) -> Result<Json<ServerTools>, HttpError> {
    Ok(Json(state.discovery.discover(&config).await?))
}

/// Re-probe the active configuration.
pub async fn availability(State(state): State<AppState>) -> Result<Json<ServerTools>, HttpError> {
    Ok(Json(state.discovery.availability().await?))
}
