//! HTTP handlers. Each one is a thin delegation to a gateway service.

pub mod gateway;
pub mod tools;

/// Liveness probe.
pub async fn health() -> &'static str {
    "OK"
}
