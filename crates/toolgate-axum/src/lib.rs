//! HTTP adapter for the toolgate gateway.
//!
//! | route | body | response |
//! |---|---|---|
//! | `GET /health` | | `OK` |
//! | `GET /status` | | `CliStatus` |
//! | `POST /exec` | `ExecRequest` | `ExecResponse` |
//! | `POST /config` | `ToolConfig` | `ServerTools` |
//! | `GET /availability` | | `ServerTools` |
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use toolgate_client as _;
#[cfg(test)]
use toolgate_db as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use bootstrap::{
    AxumContext, CorsConfig, DEFAULT_PORT, ServerConfig, bootstrap, serve, start_server,
};
pub use error::HttpError;
pub use routes::create_router;
pub use state::AppState;
