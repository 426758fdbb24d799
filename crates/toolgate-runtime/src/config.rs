//! Gateway configuration.

use std::path::PathBuf;
use std::time::Duration;

use toolgate_core::{Platform, PlatformResolver, PlatformTarget};

/// Default number of CLI processes allowed to run at once.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Default per-invocation timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shortest per-invocation timeout a configuration accepts.
pub const MIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for [`crate::ExecutionGateway`].
///
/// Resolved once at process start; the platform never comes from a request.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Deployment platform used to pick the executable.
    pub platform: Platform,
    /// Replaces the executable of the resolved platform entry.
    pub executable: Option<PathBuf>,
    /// Platform table.
    pub resolver: PlatformResolver,
    /// Upper bound on concurrently running processes (at least 1).
    pub max_concurrent: usize,
    /// Per-invocation timeout; the child is killed when it elapses.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl GatewayConfig {
    pub fn with_defaults() -> Self {
        Self {
            platform: Platform::current(),
            executable: None,
            resolver: PlatformResolver::with_defaults(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: PlatformResolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Set the per-invocation timeout, raised to [`MIN_TIMEOUT`] if shorter.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.max(MIN_TIMEOUT);
        self
    }

    /// The executable and working directory this configuration resolves to.
    pub fn target(&self) -> PlatformTarget {
        let target = self.resolver.resolve(&self.platform);
        match &self.executable {
            Some(executable) => target.with_executable(executable.clone()),
            None => target,
        }
    }
}
