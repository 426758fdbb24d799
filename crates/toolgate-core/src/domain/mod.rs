//! Domain types shared by every adapter.
//!
//! # Design
//!
//! - `ServerDefinition` / `ToolConfig` - tool-server configuration keyed by name
//! - `ToolDescriptor` / `ServerTools` - discovery results, opaque to the core
//! - `ExecRequest` / `ExecResponse` - gateway request/response contract
//! - `CliStatus` / `CliIdentity` - derived install/auth/identity status

pub(crate) mod exec;
mod status;
mod tool_server;

pub use exec::{ExecRequest, ExecResponse};
pub use status::{CliIdentity, CliStatus};
pub use tool_server::{ServerDefinition, ServerTools, ToolConfig, ToolDescriptor, TransportType};
