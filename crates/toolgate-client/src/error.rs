//! Client error types.
//!
//! Mapped to the core `TransportError` at the discovery-port boundary.

use thiserror::Error;
use toolgate_core::TransportError;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection failure, timeout or other transport-level problem.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The gateway refused the request as invalid (HTTP 400).
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Any other non-success status.
    #[error("Gateway returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not what the contract promises.
    #[error("Invalid response from gateway: {0}")]
    Decode(String),
}

impl From<ClientError> for TransportError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(e) if e.is_decode() => Self::Decode(e.to_string()),
            ClientError::Network(e) => Self::Unreachable(e.to_string()),
            ClientError::Rejected(msg) => Self::Rejected(msg),
            ClientError::Status { status, message } => Self::Status { status, message },
            ClientError::Decode(msg) => Self::Decode(msg),
        }
    }
}
