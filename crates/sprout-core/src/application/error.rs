//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::error::{ErrorCategory, SproutError};

/// The provisioning steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvisionStep {
    CopyProjectFiles,
    CopyHiddenFiles,
    WriteManifest,
    EnsureDependencyCache,
    WriteDatabaseConfig,
    WriteDocsConfig,
}

impl ProvisionStep {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CopyProjectFiles => "copy project files",
            Self::CopyHiddenFiles => "copy hidden files",
            Self::WriteManifest => "write package manifest",
            Self::EnsureDependencyCache => "create dependency cache directory",
            Self::WriteDatabaseConfig => "write database config",
            Self::WriteDocsConfig => "write docs config",
        }
    }
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A provisioning step failed. The project directory has been removed.
    #[error("Failed to {step}")]
    StepFailed {
        step: ProvisionStep,
        #[source]
        cause: Box<SproutError>,
    },

    /// Writing the API docs config failed. The project directory has been
    /// removed.
    #[error("Error while writing {path} for apidocs")]
    DocsConfigFailed {
        path: PathBuf,
        #[source]
        cause: Box<SproutError>,
    },

    /// Removing the partially provisioned project failed. `cause` is the
    /// error that triggered the rollback.
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed {
        path: PathBuf,
        reason: String,
        #[source]
        cause: Box<SproutError>,
    },

    /// An external process could not be started.
    #[error("Failed to start '{program}': {reason}")]
    ProcessSpawn { program: String, reason: String },

    /// An external process ran longer than its timeout.
    #[error("'{program}' did not finish within {seconds}s")]
    ProcessTimedOut { program: String, seconds: u64 },

    /// Shared state access failed (lock poisoned).
    #[error("Internal state lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Wrap an error with the step it happened in.
    pub fn step(step: ProvisionStep, cause: SproutError) -> Self {
        Self::StepFailed {
            step,
            cause: Box::new(cause),
        }
    }

    /// The innermost step that failed, if this is a provisioning failure.
    pub fn failed_step(&self) -> Option<ProvisionStep> {
        match self {
            Self::StepFailed { step, .. } => Some(*step),
            Self::DocsConfigFailed { .. } => Some(ProvisionStep::WriteDocsConfig),
            Self::RollbackFailed { cause, .. } => match cause.as_ref() {
                SproutError::Application(inner) => inner.failed_step(),
                _ => None,
            },
            _ => None,
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::StepFailed { step, cause } => {
                let mut out = vec![
                    format!("Step '{}' failed; no files were left behind", step),
                ];
                out.extend(cause.suggestions());
                out
            }
            Self::DocsConfigFailed { path, .. } => vec![
                format!("Could not write {}", path.display()),
                "Retry without --apidocs".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![
                format!("A partial project may remain at {}", path.display()),
                format!("Remove it manually: rm -rf {}", path.display()),
            ],
            Self::ProcessSpawn { program, .. } => vec![
                format!("Ensure '{}' is installed and in your PATH", program),
            ],
            Self::ProcessTimedOut { .. } => vec![
                "Increase install.timeout_secs in your config".into(),
                "Check your network connection".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProcessSpawn { .. } => ErrorCategory::NotFound,
            Self::StepFailed { cause, .. } => cause.category(),
            _ => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fs_error() -> SproutError {
        ApplicationError::FilesystemError {
            path: PathBuf::from("/tmp/app/package.json"),
            reason: "disk full".into(),
        }
        .into()
    }

    #[test]
    fn step_failed_reports_step() {
        let err = ApplicationError::step(ProvisionStep::WriteManifest, fs_error());
        assert_eq!(err.to_string(), "Failed to write package manifest");
        assert_eq!(err.failed_step(), Some(ProvisionStep::WriteManifest));
    }

    #[test]
    fn rollback_failure_keeps_original_step() {
        let original: SproutError =
            ApplicationError::step(ProvisionStep::CopyHiddenFiles, fs_error()).into();
        let err = ApplicationError::RollbackFailed {
            path: PathBuf::from("/tmp/app"),
            reason: "permission denied".into(),
            cause: Box::new(original),
        };
        assert_eq!(err.failed_step(), Some(ProvisionStep::CopyHiddenFiles));
    }

    #[test]
    fn source_chain_reaches_cause() {
        use std::error::Error;

        let err = ApplicationError::step(ProvisionStep::WriteManifest, fs_error());
        let source = err.source().expect("step failure has a source");
        assert!(source.to_string().contains("disk full"));
    }
}
