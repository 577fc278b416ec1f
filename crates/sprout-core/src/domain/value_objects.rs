//! Domain value objects: PackageManager, DatabaseClient.
//!
//! These are pure value types — `Copy`, equality-by-value, no identity.
//! This file's only job is to define the types, their string
//! representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── PackageManager ───────────────────────────────────────────────────────────

/// Arguments passed to every dependency install. Production dependencies
/// only, optional dependencies skipped.
pub const INSTALL_ARGS: [&str; 3] = ["install", "--production", "--no-optional"];

/// The external tool used to install the project's dependencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
}

impl PackageManager {
    /// Pick the package manager from the "use the alternate one" flag.
    pub const fn from_alternate_flag(use_alternate: bool) -> Self {
        if use_alternate { Self::Yarn } else { Self::Npm }
    }

    /// Name shown to users (`npm`, `yarn`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
        }
    }

    /// Binary spawned for installs. Yarn ships `yarnpkg` as a conflict-free
    /// alias of `yarn`.
    pub const fn binary(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarnpkg",
        }
    }

    /// Prefix for running a package script (`npm run develop`, `yarn develop`).
    pub const fn run_prefix(&self) -> &'static str {
        match self {
            Self::Npm => "npm run",
            Self::Yarn => "yarn",
        }
    }

    pub fn install_args(&self) -> Vec<String> {
        INSTALL_ARGS.iter().map(|a| a.to_string()).collect()
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "yarn" | "yarnpkg" => Ok(Self::Yarn),
            other => Err(DomainError::UnknownPackageManager(other.to_string())),
        }
    }
}

// ── DatabaseClient ───────────────────────────────────────────────────────────

/// Database client the generated application connects with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseClient {
    #[default]
    Sqlite,
    Postgres,
    Mysql,
    Mongo,
}

impl DatabaseClient {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Mongo => "mongo",
        }
    }

    /// ORM connector the application runtime loads for this client.
    pub const fn connector(&self) -> &'static str {
        match self {
            Self::Mongo => "mongoose",
            _ => "bookshelf",
        }
    }

    /// npm package of the connector, pinned like the core dependencies.
    pub fn connector_package(&self) -> String {
        format!("strapi-connector-{}", self.connector())
    }

    /// npm package of the database driver. Mongoose bundles its own.
    pub const fn driver_package(&self) -> Option<&'static str> {
        match self {
            Self::Sqlite => Some("sqlite3"),
            Self::Postgres => Some("pg"),
            Self::Mysql => Some("mysql"),
            Self::Mongo => None,
        }
    }

    pub const fn is_file_based(&self) -> bool {
        matches!(self, Self::Sqlite)
    }
}

impl fmt::Display for DatabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseClient {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            "mongo" | "mongodb" => Ok(Self::Mongo),
            other => Err(DomainError::UnsupportedDatabaseClient(other.to_string())),
        }
    }
}
