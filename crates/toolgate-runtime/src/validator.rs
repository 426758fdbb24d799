//! Allowlist check for requested command verbs.

/// Verbs the gateway is willing to run.
pub const ALLOWED_VERBS: &[&str] = &[
    "version",
    "auth",
    "repo",
    "issue",
    "pr",
    "workflow",
    "api",
    "gist",
    "secret",
    "key-management",
];

/// Outcome of validating a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl Validation {
    const fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn reject(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Case-insensitive prefix match against a fixed verb list.
#[derive(Debug, Clone)]
pub struct CommandValidator {
    verbs: Vec<String>,
}

impl Default for CommandValidator {
    fn default() -> Self {
        Self::new(ALLOWED_VERBS.iter().copied())
    }
}

impl CommandValidator {
    pub fn new<I, S>(verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            verbs: verbs
                .into_iter()
                .map(|v| v.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Check a command verb. Leading whitespace is ignored.
    pub fn validate(&self, command: &str) -> Validation {
        let command = command.trim_start().to_ascii_lowercase();
        if command.is_empty() {
            return Validation::reject("Empty command");
        }

        if self.verbs.iter().any(|verb| command.starts_with(verb.as_str())) {
            Validation::allow()
        } else {
            Validation::reject(format!(
                "Command not allowed: {}. Allowed commands: {}",
                command.trim_end(),
                self.verbs.join(", ")
            ))
        }
    }

    pub fn is_allowed(&self, command: &str) -> bool {
        self.validate(command).allowed
    }
}
