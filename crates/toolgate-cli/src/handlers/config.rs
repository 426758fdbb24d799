//! `toolgate config`: settings held by the local store.

use anyhow::{Result, bail};
use serde_json::json;

use crate::bootstrap::CliContext;
use crate::config_commands::ConfigCommand;
use crate::handlers::print_json;
use toolgate_core::{ServerDefinition, Settings, UpdateOutcome};

/// Execute a config subcommand.
pub async fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<()> {
    let current = ctx.store.initialize().await;

    if matches!(command, ConfigCommand::Show) {
        return show(ctx, &current);
    }

    let updated = edit(current, command)?;
    match ctx.store.update_settings(updated).await? {
        UpdateOutcome::Applied(tools) => {
            eprintln!("✓ Settings saved to {}", ctx.database.display());
            print_json(&tools)
        }
        UpdateOutcome::Skipped => bail!("Another settings update is already in progress"),
    }
}

fn show(ctx: &CliContext, settings: &Settings) -> Result<()> {
    let mut report = json!({
        "settings": settings,
        "serverTools": ctx.store.server_tools(),
    });
    if let Some(error) = ctx.store.last_error() {
        report["error"] = json!(error);
    }
    print_json(&report)
}

/// Apply a mutating subcommand to a copy of the settings.
fn edit(mut settings: Settings, command: ConfigCommand) -> Result<Settings> {
    match command {
        ConfigCommand::Show => {}
        ConfigCommand::SetMaxSteps { max_steps } => settings.max_steps = max_steps,
        ConfigCommand::AddServer {
            name,
            command,
            args,
            env,
            cwd,
            sse_url,
        } => {
            let mut definition = match (command, sse_url) {
                (_, Some(url)) => ServerDefinition::sse(url),
                (Some(executable), None) => ServerDefinition::stdio(executable, args),
                (None, None) => bail!("Either --command or --sse-url is required"),
            };
            for (key, value) in env {
                definition = definition.with_env(key, value);
            }
            if let Some(dir) = cwd {
                definition = definition.with_working_directory(dir);
            }
            settings.tool_config.insert(name, definition);
        }
        ConfigCommand::RemoveServer { name } => {
            if settings.tool_config.remove(&name).is_none() {
                bail!("No tool server named '{name}'");
            }
        }
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgate_core::{ToolConfig, TransportType};

    fn add_stdio(name: &str) -> ConfigCommand {
        ConfigCommand::AddServer {
            name: name.to_string(),
            command: Some("npx".to_string()),
            args: vec!["-y".to_string(), "server-github".to_string()],
            env: vec![("TOKEN".to_string(), "abc".to_string())],
            cwd: Some("/srv".to_string()),
            sse_url: None,
        }
    }

    #[test]
    fn test_set_max_steps() {
        let settings = edit(Settings::with_defaults(), ConfigCommand::SetMaxSteps { max_steps: 3 })
            .unwrap();
        assert_eq!(settings.max_steps, 3);
    }

    #[test]
    fn test_add_stdio_server() {
        let settings = edit(Settings::with_defaults(), add_stdio("github")).unwrap();
        let expected = ServerDefinition::stdio("npx", vec!["-y".into(), "server-github".into()])
            .with_env("TOKEN", "abc")
            .with_working_directory("/srv");
        assert_eq!(settings.tool_config.get("github"), Some(&expected));
    }

    #[test]
    fn test_add_sse_server() {
        let command = ConfigCommand::AddServer {
            name: "remote".to_string(),
            command: None,
            args: vec![],
            env: vec![],
            cwd: None,
            sse_url: Some("http://localhost:3000/sse".to_string()),
        };
        let settings = edit(Settings::with_defaults(), command).unwrap();
        let definition = settings.tool_config.get("remote").unwrap();
        assert_eq!(definition.transport_type, TransportType::Sse);
        assert_eq!(definition.url.as_deref(), Some("http://localhost:3000/sse"));
    }

    #[test]
    fn test_add_replaces_existing_server() {
        let settings = Settings {
            tool_config: ToolConfig::new()
                .with_server("github", ServerDefinition::stdio("old", vec![])),
            max_steps: 10,
        };
        let settings = edit(settings, add_stdio("github")).unwrap();
        assert_eq!(settings.tool_config.len(), 1);
        assert_eq!(settings.tool_config.get("github").unwrap().executable_path, "npx");
    }

    #[test]
    fn test_remove_server() {
        let settings = edit(Settings::with_defaults(), add_stdio("github")).unwrap();
        let settings = edit(
            settings,
            ConfigCommand::RemoveServer {
                name: "github".to_string(),
            },
        )
        .unwrap();
        assert!(settings.tool_config.is_empty());
    }

    #[test]
    fn test_remove_unknown_server_fails() {
        let result = edit(
            Settings::with_defaults(),
            ConfigCommand::RemoveServer {
                name: "missing".to_string(),
            },
        );
        assert!(result.unwrap_err().to_string().contains("missing"));
    }
}
