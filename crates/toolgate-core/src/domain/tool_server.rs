//! Tool-server configuration and discovery types.
//!
//! These types are shared between the Rust backend and any HTTP client.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a tool server is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// Stdio-based server - toolgate spawns the process and speaks JSON-RPC over its pipes
    #[default]
    Stdio,
    /// SSE-based server - external process reached over HTTP
    Sse,
}

/// Definition of a single tool server.
///
/// For stdio servers, `executable_path` is required. For SSE servers, `url` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDefinition {
    /// Connection type.
    #[serde(default)]
    pub transport_type: TransportType,

    /// Executable to spawn (e.g. "npx" or "/opt/homebrew/bin/npx").
    #[serde(default)]
    pub executable_path: String,

    /// Arguments passed to the executable.
    #[serde(default)]
    pub args: Vec<String>,

    /// Environment variables layered over the ambient environment.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Working directory for the process (must be absolute if specified).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,

    /// URL for SSE servers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ServerDefinition {
    /// Create a stdio server definition.
    pub fn stdio(executable_path: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            transport_type: TransportType::Stdio,
            executable_path: executable_path.into(),
            args,
            ..Self::default()
        }
    }

    /// Create an SSE server definition.
    pub fn sse(url: impl Into<String>) -> Self {
        Self {
            transport_type: TransportType::Sse,
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Add an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the working directory.
    #[must_use]
    pub fn with_working_directory(mut self, dir: impl Into<String>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Validate the definition based on its transport type.
    pub fn validate(&self) -> Result<(), String> {
        match self.transport_type {
            TransportType::Stdio => {
                if self.executable_path.trim().is_empty() {
                    return Err("Stdio server requires an executable path".to_string());
                }

                if self.executable_path.contains(char::is_whitespace) {
                    return Err(
                        "Executable path must be a program name/path only (e.g., 'npx'). \
                         Put flags and arguments in 'args'."
                            .to_string(),
                    );
                }

                if let Some(ref cwd) = self.working_directory {
                    if !cwd.is_empty() && !std::path::Path::new(cwd).is_absolute() {
                        return Err(format!("Working directory must be absolute: {cwd}"));
                    }
                }

                Ok(())
            }
            TransportType::Sse => match self.url.as_deref() {
                Some(url) if !url.trim().is_empty() => Ok(()),
                _ => Err("SSE server requires url".to_string()),
            },
        }
    }
}

/// Mapping from unique server name to its definition.
///
/// Backed by an ordered map, so names are unique by construction and
/// serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolConfig(BTreeMap<String, ServerDefinition>);

impl ToolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a server definition, returning the previous one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        definition: ServerDefinition,
    ) -> Option<ServerDefinition> {
        self.0.insert(name.into(), definition)
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_server(mut self, name: impl Into<String>, definition: ServerDefinition) -> Self {
        self.insert(name, definition);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<ServerDefinition> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&ServerDefinition> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ServerDefinition)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate every server name and definition.
    pub fn validate(&self) -> Result<(), String> {
        for (name, definition) in &self.0 {
            if name.trim().is_empty() {
                return Err("Server name cannot be empty".to_string());
            }
            if name.trim() != name {
                return Err(format!(
                    "Server name cannot have surrounding whitespace: '{name}'"
                ));
            }
            definition
                .validate()
                .map_err(|e| format!("Server '{name}': {e}"))?;
        }
        Ok(())
    }
}

impl FromIterator<(String, ServerDefinition)> for ToolConfig {
    fn from_iter<I: IntoIterator<Item = (String, ServerDefinition)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A tool exposed by a tool server.
///
/// The core never interprets these; they are passed through to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Tool name (function name).
    pub name: String,

    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON Schema for input parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<serde_json::Value>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Discovered tools keyed by server name.
///
/// A server missing from the map was unreachable during discovery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerTools(BTreeMap<String, Vec<ToolDescriptor>>);

impl ServerTools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, server: impl Into<String>, tools: Vec<ToolDescriptor>) {
        self.0.insert(server.into(), tools);
    }

    pub fn get(&self, server: &str) -> Option<&[ToolDescriptor]> {
        self.0.get(server).map(Vec::as_slice)
    }

    pub fn contains_server(&self, server: &str) -> bool {
        self.0.contains_key(server)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<ToolDescriptor>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of tools across all servers.
    pub fn tool_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl FromIterator<(String, Vec<ToolDescriptor>)> for ServerTools {
    fn from_iter<I: IntoIterator<Item = (String, Vec<ToolDescriptor>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
