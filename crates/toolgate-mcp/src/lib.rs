//! MCP tool-server discovery.
//!
//! [`McpDiscoveryService`] implements `ToolDiscoveryPort` by spawning each
//! configured stdio server, running the MCP handshake and listing its tools.
#![deny(unused_crate_dependencies)]

pub mod client;
pub mod discovery;
pub(crate) mod path;

pub use client::{McpClient, McpClientError};
pub use discovery::{DEFAULT_PROBE_TIMEOUT, DiscoveryConfig, McpDiscoveryService};

#[cfg(test)]
use tempfile as _;
