//! Settings domain types and validation.
//!
//! `Settings` is persisted as a single JSON record. These are pure domain
//! types with no infrastructure dependencies.

use serde::{Deserialize, Serialize};

use crate::domain::ToolConfig;

/// Default maximum number of agent steps.
pub const DEFAULT_MAX_STEPS: u32 = 10;

/// Upper bound accepted for `max_steps`.
pub const MAX_STEPS_LIMIT: u32 = 1_000;

/// Client settings: the configured tool servers plus the agent step budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Tool servers keyed by unique name.
    #[serde(default)]
    pub tool_config: ToolConfig,

    /// Maximum steps for the tool-calling loop (must be positive).
    pub max_steps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Settings {
    /// Compiled-in defaults: no servers, default step budget.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            tool_config: ToolConfig::new(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Serialize to the persisted record format.
    pub fn to_record(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a persisted record.
    pub fn from_record(record: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(record)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Max steps must be between 1 and {MAX_STEPS_LIMIT}, got {0}")]
    InvalidMaxSteps(u32),

    #[error("Invalid tool configuration: {0}")]
    InvalidToolConfig(String),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if !(1..=MAX_STEPS_LIMIT).contains(&settings.max_steps) {
        return Err(SettingsError::InvalidMaxSteps(settings.max_steps));
    }

    settings
        .tool_config
        .validate()
        .map_err(SettingsError::InvalidToolConfig)?;

    Ok(())
}
