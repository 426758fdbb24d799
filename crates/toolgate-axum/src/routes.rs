//! Route definitions and router construction.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        // CLI gateway
        .route("/status", get(handlers::gateway::status))
        .route("/exec", post(handlers::gateway::exec))
        // Tool servers
        .route("/config", post(handlers::tools::apply_config))
        .route("/availability", get(handlers::tools::availability))
}

/// Create the router for the gateway API.
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);

    api_routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors_config))
}
