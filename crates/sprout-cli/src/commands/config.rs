//! `sprout config` — inspect the resolved configuration.

use serde_json::Value;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.data(&value)?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised = toml::to_string_pretty(&config)
                .with_cli_context(|| "Failed to serialise config")?;
            output.data(serialised.trim_end())?;
        }

        ConfigCommands::Path => {
            output.data(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Look up a dotted key (`defaults.strapi_version`). Strings print bare,
/// everything else as JSON.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let root = serde_json::to_value(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;

    let value = key
        .split('.')
        .try_fold(&root, |node, segment| node.get(segment))
        .ok_or_else(|| CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        })?;

    Ok(match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────
