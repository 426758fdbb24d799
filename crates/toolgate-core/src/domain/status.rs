//! Derived CLI status.

use serde::{Deserialize, Serialize};

/// The account the CLI is authenticated as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliIdentity {
    pub login: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Install/auth/identity status of the CLI.
///
/// Produced in one of three terminal shapes:
/// not installed, installed but unauthenticated, or authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliStatus {
    pub is_installed: bool,
    pub is_authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<CliIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CliStatus {
    pub fn not_installed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn unauthenticated(version: Option<String>) -> Self {
        Self {
            is_installed: true,
            version,
            ..Self::default()
        }
    }

    pub fn authenticated(version: Option<String>, identity: Option<CliIdentity>) -> Self {
        Self {
            is_installed: true,
            is_authenticated: true,
            version,
            identity,
            error: None,
        }
    }
}
