//! HTTP client for a toolgate gateway.
//!
//! [`GatewayClient`] speaks the gateway's JSON contract and implements the
//! core `ToolDiscoveryPort`, so a client-side `ConfigStore` can route its
//! discovery calls over HTTP.
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod error;

pub use client::GatewayClient;
pub use config::{ClientConfig, DEFAULT_GATEWAY_URL};
pub use error::{ClientError, ClientResult};
