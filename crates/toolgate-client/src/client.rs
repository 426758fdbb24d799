//! Reqwest-backed gateway client.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use toolgate_core::{
    CliStatus, ExecRequest, ExecResponse, ServerTools, ToolConfig, ToolDiscoveryPort,
    TransportError,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Error body produced by the gateway for non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the gateway's HTTP contract.
///
/// Also serves as the [`ToolDiscoveryPort`] of a client-side `ConfigStore`.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl GatewayClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET /status`
    pub async fn status(&self) -> ClientResult<CliStatus> {
        self.get("status").await
    }

    /// `POST /exec`
    pub async fn exec(&self, request: &ExecRequest) -> ClientResult<ExecResponse> {
        self.post("exec", request).await
    }

    /// `POST /config`: apply a configuration and return what it discovered.
    pub async fn apply_config(&self, config: &ToolConfig) -> ClientResult<ServerTools> {
        self.post("config", config).await
    }

    /// `GET /availability`
    pub async fn availability(&self) -> ClientResult<ServerTools> {
        self.get("availability").await
    }

    /// `GET /health`
    pub async fn health(&self) -> ClientResult<()> {
        let response = self.http.get(self.config.endpoint("health")).send().await?;
        check_status(response).await.map(drop)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.config.endpoint(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        decode(check_status(response).await?).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");
        let response = self.http.post(&url).json(body).send().await?;
        decode(check_status(response).await?).await
    }
}

async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    if status == reqwest::StatusCode::BAD_REQUEST {
        Err(ClientError::Rejected(message))
    } else {
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait]
impl ToolDiscoveryPort for GatewayClient {
    async fn discover(&self, config: &ToolConfig) -> Result<ServerTools, TransportError> {
        Ok(self.apply_config(config).await?)
    }

    async fn availability(&self) -> Result<ServerTools, TransportError> {
        Ok(Self::availability(self).await?)
    }
}
