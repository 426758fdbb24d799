//! Tool discovery port.
//!
//! Discovery queries every configured tool server for the tools it exposes.
//! On the client side this crosses the network (HTTP adapter); on the
//! server side it is performed in-process by the MCP adapter.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ServerTools, ToolConfig};

/// Failure to obtain a discovery response at all.
///
/// A tool server that merely fails to start is not a transport error: it is
/// left out of the returned `ServerTools`.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The gateway could not be reached.
    #[error("Gateway unreachable: {0}")]
    Unreachable(String),

    /// The gateway answered with a non-success status.
    #[error("Gateway returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Malformed gateway response: {0}")]
    Decode(String),

    /// The gateway refused the configuration.
    #[error("Configuration rejected: {0}")]
    Rejected(String),
}

/// Discovery of tools across configured tool servers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolDiscoveryPort: Send + Sync {
    /// Apply `config` as the active configuration and discover its tools.
    async fn discover(&self, config: &ToolConfig) -> Result<ServerTools, TransportError>;

    /// Re-discover tools for the active configuration.
    async fn availability(&self) -> Result<ServerTools, TransportError>;
}
