//! Local filesystem adapter using tokio::fs.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use walkdir::WalkDir;

use sprout_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{SproutError, SproutResult},
};

/// Production filesystem implementation using `tokio::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

/// One entry of a directory tree, relative to its root.
enum Entry {
    Dir(PathBuf),
    File(PathBuf),
}

/// Walk `root` and collect its entries, parents before children.
fn walk(root: &Path) -> SproutResult<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            map_io_error(&path, io::Error::other(e), "read directory")
        })?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| SproutError::Internal {
                message: format!("walked outside {}: {e}", root.display()),
            })?
            .to_path_buf();

        if entry.file_type().is_dir() {
            entries.push(Entry::Dir(relative));
        } else {
            entries.push(Entry::File(relative));
        }
    }
    Ok(entries)
}

#[async_trait]
impl Filesystem for LocalFilesystem {
    async fn copy_dir_all(&self, from: &Path, to: &Path) -> SproutResult<()> {
        let root = from.to_path_buf();
        let entries = tokio::task::spawn_blocking(move || walk(&root))
            .await
            .map_err(|e| SproutError::Internal {
                message: format!("directory walk panicked: {e}"),
            })??;

        self.create_dir_all(to).await?;
        for entry in entries {
            match entry {
                Entry::Dir(relative) => self.create_dir_all(&to.join(relative)).await?,
                Entry::File(relative) => {
                    self.copy_file(&from.join(&relative), &to.join(&relative))
                        .await?
                }
            }
        }
        debug!(from = %from.display(), to = %to.display(), "Copied directory");
        Ok(())
    }

    async fn list_files(&self, dir: &Path) -> SproutResult<Vec<String>> {
        let mut reader = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| map_io_error(dir, e, "read directory"))?;

        let mut names = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| map_io_error(dir, e, "read directory"))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| map_io_error(&entry.path(), e, "get metadata"))?;
            if file_type.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> SproutResult<()> {
        tokio::fs::copy(from, to)
            .await
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, &format!("copy to {}", to.display())))
    }

    async fn write_file(&self, path: &Path, content: &str) -> SproutResult<()> {
        tokio::fs::write(path, content)
            .await
            .map_err(|e| map_io_error(path, e, "write file"))
    }

    async fn create_dir_all(&self, path: &Path) -> SproutResult<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| map_io_error(path, e, "create directory"))
    }

    async fn remove_dir_all(&self, path: &Path) -> SproutResult<()> {
        match tokio::fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io_error(path, e, "remove directory")),
        }
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> SproutError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
