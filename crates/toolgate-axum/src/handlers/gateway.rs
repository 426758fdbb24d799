//! CLI gateway handlers.

use axum::Json;
use axum::extract::State;

use crate::state::AppState;
use toolgate_core::{CliStatus, ExecRequest, ExecResponse};

/// Install/auth/identity status of the CLI.
pub async fn status(State(state): State<AppState>) -> Json<CliStatus> {
    Json(state.status.get_status().await)
}

/// Run one allowlisted command. Always 200; check `success`.
pub async fn exec(
    State(state): State<AppState>,
    Json(req): Json<ExecRequest>,
) -> Json<ExecResponse> {
    Json(state.gateway.execute(req).await)
}
