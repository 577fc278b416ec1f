//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use async_trait::async_trait;
use sprout_core::{
    application::{ApplicationError, ports::Filesystem},
    error::SproutResult,
};

/// In-memory filesystem for testing.
///
/// Paths registered with [`MemoryFilesystem::fail_on`] reject writes and
/// copies that target them; [`MemoryFilesystem::fail_removal_of`] does the
/// same for `remove_dir_all`.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    failing: HashSet<PathBuf>,
    failing_removals: HashSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn insert_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn check(&self, path: &Path, operation: &str) -> SproutResult<()> {
        if self.failing.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: format!("Failed to {}: injected failure", operation),
            }
            .into());
        }
        Ok(())
    }

    fn require_parent(&self, path: &Path) -> SproutResult<()> {
        let missing = path
            .parent()
            .is_some_and(|p| !p.as_os_str().is_empty() && !self.directories.contains(p));
        if missing {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Parent directory does not exist".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Add a file, creating its parent directories.
    pub fn seed_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(parent) = path.parent() {
            inner.insert_dirs(parent);
        }
        inner.files.insert(path.to_path_buf(), content.to_string());
    }

    /// Make writes and copies targeting `path` fail.
    pub fn fail_on(&self, path: impl AsRef<Path>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.failing.insert(path.as_ref().to_path_buf());
    }

    /// Make `remove_dir_all(path)` fail.
    pub fn fail_removal_of(&self, path: impl AsRef<Path>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.failing_removals.insert(path.as_ref().to_path_buf());
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// All file paths, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.files.keys().cloned().collect()
    }

    /// Whether anything exists at or below `path`.
    pub fn contains(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.directories.contains(path) || inner.files.keys().any(|p| p.starts_with(path))
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Filesystem for MemoryFilesystem {
    async fn copy_dir_all(&self, from: &Path, to: &Path) -> SproutResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if !inner.directories.contains(from) {
            return Err(ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: "Source directory does not exist".into(),
            }
            .into());
        }
        inner.check(to, "copy directory")?;

        let dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter_map(|d| d.strip_prefix(from).ok().map(|r| to.join(r)))
            .collect();
        let files: Vec<(PathBuf, String)> = inner
            .files
            .iter()
            .filter_map(|(p, c)| p.strip_prefix(from).ok().map(|r| (to.join(r), c.clone())))
            .collect();

        inner.insert_dirs(to);
        for dir in dirs {
            inner.insert_dirs(&dir);
        }
        for (path, content) in files {
            inner.check(&path, "copy file")?;
            inner.files.insert(path, content);
        }
        Ok(())
    }

    async fn list_files(&self, dir: &Path) -> SproutResult<Vec<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if !inner.directories.contains(dir) {
            return Err(ApplicationError::FilesystemError {
                path: dir.to_path_buf(),
                reason: "Failed to read directory: not found".into(),
            }
            .into());
        }

        Ok(inner
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect())
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> SproutResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.check(to, "copy file")?;
        inner.require_parent(to)?;
        let content = inner.files.get(from).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: "Source file does not exist".into(),
            }
        })?;
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    async fn write_file(&self, path: &Path, content: &str) -> SproutResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.check(path, "write file")?;
        inner.require_parent(path)?;
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> SproutResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.check(path, "create directory")?;
        inner.insert_dirs(path);
        Ok(())
    }

    async fn remove_dir_all(&self, path: &Path) -> SproutResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.failing_removals.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Failed to remove directory: injected failure".into(),
            }
            .into());
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copy_dir_all_preserves_structure() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/assets/files/config/server.js", "server");
        fs.seed_file("/assets/files/README.md", "readme");

        fs.copy_dir_all(Path::new("/assets/files"), Path::new("/out"))
            .await
            .unwrap();

        assert_eq!(
            fs.read_file(Path::new("/out/config/server.js")).as_deref(),
            Some("server")
        );
        assert!(fs.contains(Path::new("/out/config")));
    }

    #[tokio::test]
    async fn list_files_is_not_recursive() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/dot/gitignore", "");
        fs.seed_file("/dot/nested/skip", "");

        let names = fs.list_files(Path::new("/dot")).await.unwrap();
        assert_eq!(names, vec!["gitignore".to_string()]);
    }

    #[tokio::test]
    async fn injected_failure_rejects_write() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/out/keep", "");
        fs.fail_on("/out/package.json");

        let err = fs
            .write_file(Path::new("/out/package.json"), "{}")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("injected failure"));
    }

    #[tokio::test]
    async fn remove_missing_dir_is_noop() {
        let fs = MemoryFilesystem::new();
        fs.remove_dir_all(Path::new("/nowhere")).await.unwrap();
    }
}
