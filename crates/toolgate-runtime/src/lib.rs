//! Process-side pieces of the gateway.
//!
//! - [`CommandValidator`] enforces the verb allowlist
//! - [`TokioCommandRunner`] runs one invocation with bounded concurrency and a timeout
//! - [`ExecutionGateway`] ties validation, platform resolution and the runner together
//! - [`StatusAggregator`] derives install/auth/identity status from the gateway
#![deny(unused_crate_dependencies)]

mod config;
mod gateway;
mod runner;
mod status;
mod validator;

pub use config::{DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT, GatewayConfig, MIN_TIMEOUT};
pub use gateway::ExecutionGateway;
pub use runner::TokioCommandRunner;
pub use status::StatusAggregator;
pub use validator::{ALLOWED_VERBS, CommandValidator, Validation};

#[cfg(test)]
use tempfile as _;
