//! MCP JSON-RPC client for stdio tool servers.
//!
//! Implements just enough of the protocol to discover tools:
//! `initialize`, the `notifications/initialized` notification and
//! `tools/list`. Reference: <https://spec.modelcontextprotocol.io/>

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;
use toolgate_core::{ServerDefinition, ToolDescriptor};

/// Protocol revision sent in `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Non-JSON lines tolerated before a response (npx prints banners).
const MAX_SKIPPED_LINES: usize = 10;

#[derive(Debug, Error)]
pub enum McpClientError {
    #[error("Failed to spawn MCP server process: {0}")]
    SpawnFailed(String),

    #[error("Failed to communicate with MCP server: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("MCP protocol error: {0}")]
    ProtocolError(String),

    #[error("Timeout waiting for MCP server response")]
    Timeout,

    #[error("MCP server returned error: code={code}, message={message}")]
    ServerError { code: i64, message: String },

    #[error("Server not connected")]
    NotConnected,
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Result of `initialize`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub server_info: ServerInfo,
    #[serde(default)]
    pub capabilities: ServerCapabilities,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerCapabilities {
    #[serde(default)]
    pub tools: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct McpToolSchema {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    input_schema: Option<Value>,
}

/// Client for one stdio MCP server session.
///
/// The child is killed when the client is dropped.
pub struct McpClient {
    client_name: String,
    request_timeout: Duration,
    process: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: Option<BufReader<ChildStdout>>,
    next_id: u64,
    capabilities: Option<ServerCapabilities>,
}

impl McpClient {
    pub fn new(client_name: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            client_name: client_name.into(),
            request_timeout,
            process: None,
            stdin: None,
            stdout: None,
            next_id: 1,
            capabilities: None,
        }
    }

    /// Spawn the server described by `definition` and run the handshake.
    pub async fn connect_stdio(
        &mut self,
        definition: &ServerDefinition,
    ) -> Result<InitializeResult, McpClientError> {
        let exe_path = definition.executable_path.as_str();
        crate::path::validate_exe_path(exe_path).map_err(McpClientError::SpawnFailed)?;

        let cwd = definition
            .working_directory
            .as_deref()
            .filter(|dir| !dir.is_empty());
        if let Some(dir) = cwd {
            crate::path::validate_working_dir(dir).map_err(McpClientError::SpawnFailed)?;
        }

        let effective_path = crate::path::build_effective_path(exe_path);

        let mut command = Command::new(exe_path);
        command
            .args(&definition.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env("PATH", &effective_path)
            // User-provided variables win, including PATH.
            .envs(&definition.env)
            .kill_on_drop(true);

        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|e| {
            McpClientError::SpawnFailed(format!(
                "Failed to spawn '{exe_path}': {e}\nArgs: {:?}\nCwd: {cwd:?}\nEffective PATH: {}",
                definition.args,
                effective_path.to_string_lossy()
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| McpClientError::SpawnFailed("Failed to get stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| McpClientError::SpawnFailed("Failed to get stdout".to_string()))?;

        if let Some(stderr) = child.stderr.take() {
            let server = exe_path.to_string();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::debug!(server = %server, "{line}");
                }
            });
        }

        self.process = Some(child);
        self.stdin = Some(stdin);
        self.stdout = Some(BufReader::new(stdout));

        self.initialize().await
    }

    async fn initialize(&mut self) -> Result<InitializeResult, McpClientError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "clientInfo": {
                "name": self.client_name,
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {}
        });

        let result: InitializeResult = self.request("initialize", Some(params)).await?;
        self.capabilities = Some(result.capabilities.clone());

        self.notify("notifications/initialized").await?;

        Ok(result)
    }

    /// List the server's tools. Servers without the tools capability have none.
    pub async fn list_tools(&mut self) -> Result<Vec<ToolDescriptor>, McpClientError> {
        let supports_tools = self
            .capabilities
            .as_ref()
            .is_some_and(|c| c.tools.is_some());
        if !supports_tools {
            return Ok(Vec::new());
        }

        let result: Value = self.request("tools/list", None).await?;
        let tools_value = result.get("tools").cloned().unwrap_or_else(|| json!([]));
        let tools: Vec<McpToolSchema> = serde_json::from_value(tools_value)?;

        Ok(tools
            .into_iter()
            .map(|t| ToolDescriptor {
                name: t.name,
                description: t.description,
                input_schema: t.input_schema,
            })
            .collect())
    }

    async fn request<T: for<'de> Deserialize<'de>>(
        &mut self,
        method: &str,
        params: Option<Value>,
    ) -> Result<T, McpClientError> {
        let id = self.next_id;
        self.next_id += 1;

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        self.write_line(&serde_json::to_string(&request)?).await?;

        let response = match timeout(self.request_timeout, self.read_response(id)).await {
            Ok(result) => result?,
            Err(_) => return Err(McpClientError::Timeout),
        };

        if let Some(err) = response.error {
            return Err(McpClientError::ServerError {
                code: err.code,
                message: err.message,
            });
        }

        let result = response.result.ok_or_else(|| {
            McpClientError::ProtocolError("Missing result in response".to_string())
        })?;

        Ok(serde_json::from_value(result)?)
    }

    /// Read until the response for `id`, skipping blank lines, stray output
    /// and server-initiated messages.
    async fn read_response(&mut self, id: u64) -> Result<JsonRpcResponse, McpClientError> {
        let reader = self.stdout.as_mut().ok_or(McpClientError::NotConnected)?;

        let mut skipped = 0;
        while skipped < MAX_SKIPPED_LINES {
            let mut line = String::new();
            if reader.read_line(&mut line).await? == 0 {
                return Err(McpClientError::ProtocolError(
                    "Server closed connection".to_string(),
                ));
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<JsonRpcResponse>(trimmed) {
                Ok(response) if response.id == Some(id) => return Ok(response),
                Ok(_) => tracing::debug!(line = trimmed, "Skipping unrelated JSON-RPC message"),
                Err(_) => tracing::debug!(line = trimmed, "Skipping non-JSON-RPC output"),
            }
            skipped += 1;
        }

        Err(McpClientError::ProtocolError(
            "No valid JSON-RPC response received".to_string(),
        ))
    }

    async fn notify(&mut self, method: &str) -> Result<(), McpClientError> {
        let notification = json!({
            "jsonrpc": "2.0",
            "method": method,
        });
        self.write_line(&serde_json::to_string(&notification)?).await
    }

    async fn write_line(&mut self, line: &str) -> Result<(), McpClientError> {
        let stdin = self.stdin.as_mut().ok_or(McpClientError::NotConnected)?;
        stdin.write_all(line.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }

    pub const fn is_connected(&self) -> bool {
        self.stdin.is_some() && self.process.is_some()
    }

    /// Close the pipes and kill the server.
    pub fn disconnect(&mut self) {
        self.stdin = None;
        self.stdout = None;
        if let Some(mut process) = self.process.take() {
            if let Err(e) = process.start_kill() {
                tracing::debug!(error = %e, "MCP server already exited");
            }
        }
        self.capabilities = None;
    }
}

impl Drop for McpClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}
