//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx`, `reqwest` or `tokio::process` types in any signature
//! - Business failures (rejected command, non-zero exit) are values, not errors
//! - Errors here are for faults the caller cannot reason about structurally

pub mod command_runner;
pub mod settings_repository;
pub mod tool_discovery;

use thiserror::Error;

pub use command_runner::{CommandInvocation, CommandRunner};
pub use settings_repository::SettingsRepository;
pub use tool_discovery::{ToolDiscoveryPort, TransportError};

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx errors)
/// and provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Core error type for semantic domain errors.
///
/// Returned by `ConfigStore`; the CLI reports it through `anyhow`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The discovery endpoint could not be reached or answered with a fault.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),
}
