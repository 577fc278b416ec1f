//! `sprout init` — create a default configuration file.

use std::path::PathBuf;

use tracing::info;

use crate::{
    cli::InitArgs,
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Write the default configuration to the platform config path, or to
/// `.sprout.toml` in the current directory with `--local`.
pub fn execute(args: InitArgs, output: OutputManager) -> CliResult<()> {
    let config_path = target_path(&args);

    // Bail early if the file already exists and --force was not given.
    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    let toml = toml::to_string_pretty(&AppConfig::default())
        .with_cli_context(|| "Failed to serialise default config")?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }

    std::fs::write(&config_path, toml)
        .with_cli_context(|| format!("Failed to write config to '{}'", config_path.display()))?;

    info!(path = %config_path.display(), "Config written");
    output.success(&format!("Configuration created at {}", config_path.display()))?;
    Ok(())
}

fn target_path(args: &InitArgs) -> PathBuf {
    if args.local {
        PathBuf::from(LOCAL_CONFIG_FILE)
    } else {
        AppConfig::config_path()
    }
}
