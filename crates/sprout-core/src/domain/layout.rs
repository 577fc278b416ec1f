//! Paths of the generated artifacts, relative to the project root.

/// Generated package manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Dependency cache directory. Created before install so tooling that
/// expects it finds it even when install is skipped or fails.
pub const DEPENDENCY_CACHE_DIR: &str = "node_modules";

/// Database/environment configuration.
pub const DATABASE_CONFIG_FILE: &str = "config/database.js";

/// Optional API-monitoring configuration.
pub const DOCS_CONFIG_FILE: &str = "optic.yml";

/// Prefix given to every file copied from the hidden-files source.
pub const HIDDEN_FILE_MARKER: char = '.';

/// Destination name for a hidden-file template (`gitignore` -> `.gitignore`).
pub fn hidden_file_name(template_name: &str) -> String {
    format!("{HIDDEN_FILE_MARKER}{template_name}")
}
