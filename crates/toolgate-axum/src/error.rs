//! Axum-specific error types and mappings.
//!
//! Only transport-level faults become HTTP errors. Rejected commands and
//! failed processes are ordinary 200 responses with `success == false`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use toolgate_core::TransportError;

#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A dependency of the gateway is unreachable.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<TransportError> for HttpError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Rejected(msg) => Self::BadRequest(msg),
            TransportError::Unreachable(msg) => Self::ServiceUnavailable(msg),
            TransportError::Status { status, message } => {
                Self::Internal(format!("Upstream HTTP {status}: {message}"))
            }
            TransportError::Decode(msg) => Self::Internal(msg),
        }
    }
}
