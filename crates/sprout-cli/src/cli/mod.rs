//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value parsers.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use sprout_core::domain::DatabaseClient;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "sprout",
    bin_name = "sprout",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f331} Create a new Strapi application",
    long_about = "Sprout provisions a ready-to-run Strapi project: the \
                  project skeleton, package.json, database configuration, \
                  and installed dependencies.",
    after_help = "EXAMPLES:\n\
        \x20 sprout new my-blog\n\
        \x20 sprout new my-api --dbclient postgres --dbhost localhost --dbname api\n\
        \x20 sprout new my-app --use-yarn --apidocs\n\
        \x20 sprout completions bash > /usr/share/bash-completion/completions/sprout",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project.
    #[command(
        visible_alias = "n",
        about = "Create a new Strapi project",
        after_help = "EXAMPLES:\n\
            \x20 sprout new my-blog\n\
            \x20 sprout new ./apps/cms --name \"My CMS\" --no-install\n\
            \x20 sprout new my-api --dbclient mongo --dbhost 127.0.0.1 --dbport 27017\n\
            \x20 sprout new my-app --dependency strapi-plugin-graphql@3.6.8"
    )]
    New(NewArgs),

    /// Initialise a Sprout configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 sprout init           # platform config directory\n\
            \x20 sprout init --local   # .sprout.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 sprout completions bash > ~/.local/share/bash-completion/completions/sprout\n\
            \x20 sprout completions zsh  > ~/.zfunc/_sprout\n\
            \x20 sprout completions fish > ~/.config/fish/completions/sprout.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Sprout configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 sprout config get defaults.strapi_version\n\
            \x20 sprout config list\n\
            \x20 sprout config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `sprout new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Where to create the project. Must not exist or be empty.
    #[arg(value_name = "PATH", help = "Project directory")]
    pub path: PathBuf,

    /// Application name. Defaults to the last component of PATH.
    #[arg(long = "name", value_name = "NAME", help = "Application name")]
    pub name: Option<String>,

    /// Database client.
    #[arg(
        long = "dbclient",
        value_name = "CLIENT",
        value_enum,
        help = "Database client"
    )]
    pub dbclient: Option<DbClient>,

    #[arg(long = "dbhost", value_name = "HOST", help = "Database host")]
    pub dbhost: Option<String>,

    #[arg(long = "dbport", value_name = "PORT", help = "Database port")]
    pub dbport: Option<u16>,

    #[arg(long = "dbname", value_name = "NAME", help = "Database name")]
    pub dbname: Option<String>,

    #[arg(long = "dbusername", value_name = "USER", help = "Database username")]
    pub dbusername: Option<String>,

    #[arg(long = "dbpassword", value_name = "PASSWORD", help = "Database password")]
    pub dbpassword: Option<String>,

    #[arg(long = "dbssl", help = "Connect to the database over SSL")]
    pub dbssl: bool,

    /// Database file, for sqlite only.
    #[arg(
        long = "dbfilename",
        value_name = "FILE",
        help = "Database file (sqlite)"
    )]
    pub dbfilename: Option<String>,

    /// Extra dependency written to package.json. Repeatable.
    #[arg(
        long = "dependency",
        value_name = "NAME@VERSION",
        value_parser = parse_dependency,
        help = "Additional dependency (repeatable)"
    )]
    pub dependencies: Vec<(String, String)>,

    /// Version pinned on every core dependency.
    #[arg(
        long = "strapi-version",
        value_name = "VERSION",
        help = "Strapi version to pin"
    )]
    pub strapi_version: Option<String>,

    /// Install with yarn.
    #[arg(long = "use-yarn", conflicts_with = "use_npm", help = "Install with yarn")]
    pub use_yarn: bool,

    /// Install with npm, even if the config prefers yarn.
    #[arg(long = "use-npm", help = "Install with npm")]
    pub use_npm: bool,

    /// Create the files but do not run the package manager.
    #[arg(long = "no-install", help = "Skip dependency installation")]
    pub no_install: bool,

    /// Add Optic API documentation support.
    #[arg(long = "apidocs", help = "Enable API docs (Optic)")]
    pub apidocs: bool,

    /// Print the package.json that would be written and exit.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

/// Database clients accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DbClient {
    #[value(alias = "sqlite3")]
    Sqlite,
    #[value(aliases = ["pg", "postgresql"])]
    Postgres,
    Mysql,
    #[value(alias = "mongodb")]
    Mongo,
}

impl From<DbClient> for DatabaseClient {
    fn from(client: DbClient) -> Self {
        match client {
            DbClient::Sqlite => Self::Sqlite,
            DbClient::Postgres => Self::Postgres,
            DbClient::Mysql => Self::Mysql,
            DbClient::Mongo => Self::Mongo,
        }
    }
}

/// Parse `name@version`. The `@` that starts a scoped name is not a
/// separator.
pub fn parse_dependency(raw: &str) -> Result<(String, String), String> {
    match raw.rsplit_once('@') {
        Some((name, version)) if !name.is_empty() && !version.is_empty() => {
            Ok((name.to_string(), version.to_string()))
        }
        _ => Err(format!("expected NAME@VERSION, got '{raw}'")),
    }
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `sprout init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.sprout.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `sprout completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `sprout config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `install.timeout_secs`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
