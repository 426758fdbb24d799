//! Core domain types, ports and services for toolgate.
//!
//! This crate has no infrastructure dependencies: process spawning, HTTP,
//! and storage live behind the traits in [`ports`] and are implemented by
//! the adapter crates (`toolgate-runtime`, `toolgate-mcp`, `toolgate-db`,
//! `toolgate-client`).
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod paths;
pub mod platform;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    CliIdentity, CliStatus, ExecRequest, ExecResponse, ServerDefinition, ServerTools, ToolConfig,
    ToolDescriptor, TransportType,
};
pub use paths::{PathError, data_root, database_path};
pub use platform::{Platform, PlatformResolver, PlatformTarget};
pub use ports::{
    CommandInvocation, CommandRunner, CoreError, RepositoryError, SettingsRepository,
    ToolDiscoveryPort, TransportError,
};
pub use services::{ConfigStore, UpdateOutcome};
pub use settings::{DEFAULT_MAX_STEPS, Settings, SettingsError, validate_settings};
