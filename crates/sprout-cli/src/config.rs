//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `SPROUT__<SECTION>__<KEY>`
//! 3. `.sprout.toml` in the current directory
//! 4. The `--config` file, or the platform config file
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = ".sprout.toml";

const ENV_PREFIX: &str = "SPROUT";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    /// Dependency install settings.
    pub install: InstallConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Where the project skeleton comes from.
    pub resources: ResourcesConfig,
    /// Log file settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Version pinned on every core dependency.
    pub strapi_version: String,
    /// Core dependencies, each pinned to `strapi_version`.
    pub dependencies: Vec<String>,
    /// `npm` or `yarn`.
    pub package_manager: String,
    /// Database client used when `--dbclient` is absent.
    pub dbclient: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            strapi_version: "3.6.8".into(),
            dependencies: [
                "strapi",
                "strapi-admin",
                "strapi-utils",
                "strapi-plugin-content-type-builder",
                "strapi-plugin-content-manager",
                "strapi-plugin-users-permissions",
                "strapi-plugin-email",
                "strapi-plugin-upload",
                "strapi-plugin-i18n",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            package_manager: "npm".into(),
            dbclient: "sqlite".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Kill the package manager after this many seconds. Unset waits forever.
    pub timeout_secs: Option<u64>,
}

impl InstallConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Directory with `files/` and `dot-files/`. Unset uses the bundled tree.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to this file.
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration, layering file and environment over defaults.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist. Without it the platform config file is read if present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required, Path::new(LOCAL_CONFIG_FILE))
    }

    fn load_from(path: &Path, required: bool, local: &Path) -> anyhow::Result<Self> {
        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(File::from(local).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("defaults.dependencies"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.sprout.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "sprout", "sprout")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }
}
