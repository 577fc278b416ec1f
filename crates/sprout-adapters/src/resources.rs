//! Project skeleton discovery.
//!
//! The skeleton is a directory holding `files/` and `dot-files/`. It is
//! resolved at runtime, first complete candidate wins:
//!
//! 1. The explicit override (`resources.dir` in the CLI config). When given,
//!    it is the only candidate.
//! 2. `$SPROUT_RESOURCES_DIR`.
//! 3. `<executable-dir>/resources`, for a binary shipped next to its skeleton.
//! 4. `<executable-dir>/../share/sprout/resources`, the usual prefix layout.
//! 5. The `resources/` directory of this crate's source checkout, so
//!    `cargo run` and tests work without installing anything.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use sprout_core::{application::AssetSource, error::SproutError, error::SproutResult};

/// Environment variable naming a skeleton directory.
pub const RESOURCES_DIR_ENV: &str = "SPROUT_RESOURCES_DIR";

/// Find the project skeleton. See the module docs for the search order.
#[instrument]
pub fn resolve_assets(override_dir: Option<&Path>) -> SproutResult<AssetSource> {
    let candidates = match override_dir {
        Some(dir) => vec![dir.to_path_buf()],
        None => candidate_paths(),
    };
    first_complete(candidates)
}

/// The skeleton found without an explicit override.
pub fn bundled_assets() -> SproutResult<AssetSource> {
    resolve_assets(None)
}

fn first_complete(candidates: Vec<PathBuf>) -> SproutResult<AssetSource> {
    for candidate in &candidates {
        if is_complete(candidate) {
            info!(path = %candidate.display(), "Using project skeleton");
            return Ok(AssetSource::from_root(candidate));
        }
        debug!(path = %candidate.display(), "No skeleton here");
    }
    Err(SproutError::MissingAssets {
        searched: candidates,
    })
}

fn is_complete(dir: &Path) -> bool {
    let assets = AssetSource::from_root(dir);
    assets.files_dir.is_dir() && assets.hidden_files_dir.is_dir()
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(4);

    if let Some(dir) = std::env::var_os(RESOURCES_DIR_ENV).filter(|v| !v.is_empty()) {
        paths.push(PathBuf::from(dir));
    }

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(exe_dir.join("resources"));
        paths.push(exe_dir.join("../share/sprout/resources"));
    }

    paths.push(Path::new(env!("CARGO_MANIFEST_DIR")).join("resources"));
    paths
}
