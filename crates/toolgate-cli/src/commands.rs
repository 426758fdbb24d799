//! Top-level subcommands.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config_commands::ConfigCommand;

/// Available commands.
///
/// `serve` runs the gateway in this process; every other command talks to
/// a running gateway at `--url`.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP gateway
    Serve(ServeArgs),

    /// Show whether the GitHub CLI is installed and authenticated
    Status,

    /// Run an allowlisted GitHub CLI command through the gateway
    Exec {
        /// Command verb, e.g. "pr list" or "version"
        command: String,
        /// Extra arguments passed after the verb
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
        /// Environment override for the child process (KEY=VALUE, repeatable)
        #[arg(long = "env", value_parser = parse_key_value)]
        env: Vec<(String, String)>,
        /// Working directory override
        #[arg(long)]
        cwd: Option<String>,
    },

    /// View or change the stored tool-server settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Re-probe the configured tool servers
    Availability,
}

/// Options for `toolgate serve`.
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    /// Port to listen on
    #[arg(short, long, default_value_t = toolgate_axum::DEFAULT_PORT)]
    pub port: u16,
    /// Deployment platform used to pick the CLI executable (windows, macos, linux)
    #[arg(long, env = "TOOLGATE_PLATFORM")]
    pub platform: Option<String>,
    /// Path to the gh executable, replacing the platform default
    #[arg(long = "gh-path", env = "TOOLGATE_GH_PATH")]
    pub gh_path: Option<PathBuf>,
    /// Maximum number of CLI processes running at once
    #[arg(long, default_value_t = toolgate_runtime::DEFAULT_MAX_CONCURRENT)]
    pub max_concurrent: usize,
    /// Per-command timeout in seconds
    #[arg(long, default_value_t = toolgate_runtime::DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,
    /// Per-server tool discovery timeout in seconds
    #[arg(long, default_value_t = toolgate_mcp::DEFAULT_PROBE_TIMEOUT.as_secs())]
    pub discovery_timeout_secs: u64,
    /// Allowed CORS origin (repeatable; all origins allowed when omitted)
    #[arg(long = "allow-origin")]
    pub allow_origins: Vec<String>,
}

/// Parse a `KEY=VALUE` pair.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Cli;
    use clap::Parser;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("GH_HOST=github.example.com"),
            Ok(("GH_HOST".to_string(), "github.example.com".to_string()))
        );
        assert_eq!(
            parse_key_value("A=b=c"),
            Ok(("A".to_string(), "b=c".to_string()))
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["toolgate", "serve"]);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 9878);
        assert_eq!(args.max_concurrent, 4);
        assert_eq!(args.timeout_secs, 30);
        assert_eq!(args.discovery_timeout_secs, 30);
        assert!(args.allow_origins.is_empty());
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from([
            "toolgate",
            "serve",
            "--port",
            "9000",
            "--platform",
            "windows",
            "--gh-path",
            "/opt/gh/bin/gh",
            "--allow-origin",
            "http://localhost:5173",
            "--allow-origin",
            "http://localhost:1420",
        ]);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, 9000);
        assert_eq!(args.platform.as_deref(), Some("windows"));
        assert_eq!(args.gh_path, Some(PathBuf::from("/opt/gh/bin/gh")));
        assert_eq!(args.allow_origins.len(), 2);
    }

    #[test]
    fn test_exec_collects_trailing_args() {
        let cli = Cli::parse_from([
            "toolgate",
            "exec",
            "--env",
            "GH_HOST=example.com",
            "--cwd",
            "/work",
            "pr list",
            "--limit",
            "5",
        ]);
        let Commands::Exec {
            command,
            args,
            env,
            cwd,
        } = cli.command
        else {
            panic!("expected exec");
        };
        assert_eq!(command, "pr list");
        assert_eq!(args, vec!["--limit", "5"]);
        assert_eq!(env, vec![("GH_HOST".to_string(), "example.com".to_string())]);
        assert_eq!(cwd.as_deref(), Some("/work"));
    }
}
