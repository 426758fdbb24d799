//! Client configuration.

use std::time::Duration;

/// Gateway address used when nothing else is configured.
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:9878";

/// Configuration for [`crate::GatewayClient`].
///
/// # Example
///
/// ```
/// use toolgate_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("http://localhost:9000/")
///     .with_timeout(Duration::from_secs(10));
/// assert_eq!(config.base_url(), "http://localhost:9000");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) base_url: String,
    pub(crate) user_agent: String,
    /// Covers discovery, which may start several tool servers.
    pub(crate) timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: concat!("toolgate-client/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
