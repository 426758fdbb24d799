//! Deployment platform table.
//!
//! Maps a deployment-time platform identifier to the CLI executable and
//! the working directory used when a request carries no override. The
//! lookup is static: nothing on the executing host is probed. The table is
//! built once at process start and injected into the gateway.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Logical deployment platform.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Windows,
    Macos,
    Linux,
    /// Any identifier without a dedicated table entry.
    Other(String),
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        std::env::consts::OS.parse().unwrap_or_else(|never| match never {})
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Windows => "windows",
            Self::Macos => "macos",
            Self::Linux => "linux",
            Self::Other(name) => name,
        }
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "windows" | "win32" | "win" => Self::Windows,
            "macos" | "darwin" | "mac" => Self::Macos,
            "linux" => Self::Linux,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the CLI lives and where it runs by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformTarget {
    pub executable: PathBuf,
    pub working_dir: PathBuf,
}

impl PlatformTarget {
    pub fn new(executable: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Replace the executable, keeping the working directory.
    #[must_use]
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }
}

/// Static platform → target lookup with a default entry.
#[derive(Debug, Clone)]
pub struct PlatformResolver {
    entries: BTreeMap<Platform, PlatformTarget>,
    fallback: PlatformTarget,
}

impl Default for PlatformResolver {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl PlatformResolver {
    /// Table with the standard `gh` install locations.
    pub fn with_defaults() -> Self {
        let entries = BTreeMap::from([
            (
                Platform::Windows,
                PlatformTarget::new(r"C:\Program Files\GitHub CLI\gh.exe", r"C:\"),
            ),
            (
                Platform::Macos,
                PlatformTarget::new("/opt/homebrew/bin/gh", "/tmp"),
            ),
            (Platform::Linux, PlatformTarget::new("/usr/bin/gh", "/tmp")),
        ]);

        Self {
            entries,
            fallback: PlatformTarget::new("gh", "."),
        }
    }

    /// Add or replace an entry.
    #[must_use]
    pub fn with_entry(mut self, platform: Platform, target: PlatformTarget) -> Self {
        self.entries.insert(platform, target);
        self
    }

    /// Replace the default entry used for unknown platforms.
    #[must_use]
    pub fn with_fallback(mut self, target: PlatformTarget) -> Self {
        self.fallback = target;
        self
    }

    /// Look up a platform. Unknown platforms get the default entry.
    pub fn resolve(&self, platform: &Platform) -> PlatformTarget {
        self.entries.get(platform).cloned().unwrap_or_else(|| {
            tracing::debug!(%platform, "No platform entry, using default target");
            self.fallback.clone()
        })
    }
}
