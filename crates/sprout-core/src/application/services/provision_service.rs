//! Provision Service - builds the project skeleton on disk.
//!
//! Steps run strictly in order:
//! 1. Copy the static asset tree
//! 2. Copy hidden-file templates, prefixing each name with `.`
//! 3. Write `package.json`
//! 4. Ensure `node_modules/` exists
//! 5. Write `config/database.js`
//! 6. Optionally write `optic.yml`
//!
//! All six form one unit: any failure removes the whole project directory
//! before the error is returned.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        error::ProvisionStep,
        ports::{Filesystem, LifecycleReporter},
    },
    domain::{
        EventScope, LifecycleEvent, ProvisionRequest,
        layout::{
            DATABASE_CONFIG_FILE, DEPENDENCY_CACHE_DIR, DOCS_CONFIG_FILE, MANIFEST_FILE,
            hidden_file_name,
        },
        render_database_config, render_docs_config, render_manifest,
    },
    error::{SproutError, SproutResult},
};

/// Where the skeleton is copied from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSource {
    /// Copied verbatim into the project root.
    pub files_dir: PathBuf,
    /// Every file in here is copied to the root as `.<name>`.
    pub hidden_files_dir: PathBuf,
}

impl AssetSource {
    /// Standard layout: `<root>/files` and `<root>/dot-files`.
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            files_dir: root.join("files"),
            hidden_files_dir: root.join("dot-files"),
        }
    }
}

/// A successfully provisioned project, ready for install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    pub root: PathBuf,
    pub hidden_files: usize,
}

/// Runs the provisioning steps with all-or-nothing rollback.
pub struct Provisioner {
    filesystem: Arc<dyn Filesystem>,
    reporter: Arc<dyn LifecycleReporter>,
    assets: AssetSource,
}

impl Provisioner {
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        reporter: Arc<dyn LifecycleReporter>,
        assets: AssetSource,
    ) -> Self {
        Self {
            filesystem,
            reporter,
            assets,
        }
    }

    /// Provision the project described by `request`.
    ///
    /// On error the target path no longer exists (unless removing it failed,
    /// which is reported as [`ApplicationError::RollbackFailed`]).
    #[instrument(
        skip_all,
        fields(
            project = %request.name(),
            root = %request.root_path().display()
        )
    )]
    pub async fn provision(&self, request: &ProvisionRequest) -> SproutResult<Provisioned> {
        info!("Creating files");

        match self.run_steps(request).await {
            Ok(hidden_files) => {
                info!(hidden_files, "Project files provisioned");
                Ok(Provisioned {
                    root: request.root_path().to_path_buf(),
                    hidden_files,
                })
            }
            Err(e) => {
                warn!(error = %e, "Provisioning failed, rolling back");
                Err(self.rollback(request.root_path(), e).await)
            }
        }
    }

    async fn run_steps(&self, request: &ProvisionRequest) -> SproutResult<usize> {
        let root = request.root_path();
        let scope = EventScope::from(request);

        run_step(
            ProvisionStep::CopyProjectFiles,
            self.filesystem.copy_dir_all(&self.assets.files_dir, root),
        )
        .await?;

        let hidden_files = run_step(ProvisionStep::CopyHiddenFiles, self.copy_hidden_files(root))
            .await?;

        self.reporter.emit(&LifecycleEvent::FilesCopied {
            scope: scope.clone(),
        });

        run_step(ProvisionStep::WriteManifest, async {
            let manifest = render_manifest(request)?;
            self.filesystem
                .write_file(&root.join(MANIFEST_FILE), &manifest)
                .await
        })
        .await?;

        self.reporter.emit(&LifecycleEvent::PackageManifestWritten {
            scope: scope.clone(),
        });

        run_step(
            ProvisionStep::EnsureDependencyCache,
            self.filesystem.create_dir_all(&root.join(DEPENDENCY_CACHE_DIR)),
        )
        .await?;

        run_step(ProvisionStep::WriteDatabaseConfig, async {
            let config = render_database_config(request.client(), request.connection())?;
            self.write_with_parents(&root.join(DATABASE_CONFIG_FILE), &config)
                .await
        })
        .await?;

        self.reporter
            .emit(&LifecycleEvent::ConfigFilesWritten { scope });

        if request.docs() {
            self.write_docs_config(request).await?;
        }

        Ok(hidden_files)
    }

    async fn copy_hidden_files(&self, root: &Path) -> SproutResult<usize> {
        let dir = &self.assets.hidden_files_dir;
        let names = self.filesystem.list_files(dir).await?;
        debug!(count = names.len(), "Copying hidden files");

        // Copies are independent; the first failure fails the join.
        let copies = names.iter().map(|name| {
            let from = dir.join(name);
            let to = root.join(hidden_file_name(name));
            async move { self.filesystem.copy_file(&from, &to).await }
        });
        try_join_all(copies).await?;

        Ok(names.len())
    }

    async fn write_docs_config(&self, request: &ProvisionRequest) -> SproutResult<()> {
        let path = request.root_path().join(DOCS_CONFIG_FILE);
        let content = render_docs_config(&request.package_name());

        self.filesystem
            .write_file(&path, &content)
            .await
            .map_err(|cause| {
                error!(path = %path.display(), "Error while writing docs config");
                ApplicationError::DocsConfigFailed {
                    path,
                    cause: Box::new(cause),
                }
                .into()
            })
    }

    async fn write_with_parents(&self, path: &Path, content: &str) -> SproutResult<()> {
        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent).await?;
        }
        self.filesystem.write_file(path, content).await
    }

    /// Remove the project directory, returning the error to surface.
    async fn rollback(&self, root: &Path, cause: SproutError) -> SproutError {
        match self.filesystem.remove_dir_all(root).await {
            Ok(()) => {
                info!("Rollback successful");
                cause
            }
            Err(e) => {
                warn!(
                    error = %e,
                    path = %root.display(),
                    "Rollback failed"
                );
                ApplicationError::RollbackFailed {
                    path: root.to_path_buf(),
                    reason: e.to_string(),
                    cause: Box::new(cause),
                }
                .into()
            }
        }
    }
}

/// Await one step, tagging any error with the step it came from.
async fn run_step<T, F>(step: ProvisionStep, fut: F) -> SproutResult<T>
where
    F: Future<Output = SproutResult<T>>,
{
    debug!(step = %step, "Running step");
    fut.await
        .map_err(|e| ApplicationError::step(step, e).into())
}
