//! Root error type for sprout-core.
//!
//! Domain and application errors fold into [`SproutError`]; the CLI maps its
//! [`ErrorCategory`] to an exit code.

use std::path::PathBuf;

use thiserror::Error;

use crate::application::{ApplicationError, ProvisionStep};
use crate::domain::DomainError;

#[derive(Debug, Error, Clone)]
pub enum SproutError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// No project skeleton (`files/` and `dot-files/`) in any searched
    /// location.
    #[error("Project skeleton not found (searched {})", display_paths(.searched))]
    MissingAssets { searched: Vec<PathBuf> },

    /// A bug in sprout itself.
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl SproutError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::MissingAssets { .. } => vec![
                "Point `resources.dir` (or SPROUT_RESOURCES_DIR) at a directory containing files/ and dot-files/".into(),
                "Or reinstall sprout together with its resources/ directory".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Sprout".into(),
                "Please report this issue at: https://github.com/cosecruz/sprout/issues".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Compatibility => ErrorCategory::Compatibility,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::MissingAssets { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// The provisioning step that failed, if any.
    pub fn failed_step(&self) -> Option<ProvisionStep> {
        match self {
            Self::Application(e) => e.failed_step(),
            _ => None,
        }
    }

    /// Only a timed-out package manager is worth running again unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::ProcessTimedOut { .. })
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Configuration,
    Internal,
}

pub type SproutResult<T> = Result<T, SproutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_assets_is_configuration() {
        let err = SproutError::MissingAssets {
            searched: vec![PathBuf::from("/a/resources"), PathBuf::from("/b/resources")],
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.to_string().contains("/a/resources, /b/resources"));
        assert!(err.suggestions().iter().any(|s| s.contains("resources.dir")));
    }

    #[test]
    fn failed_step_sees_through_wrapping() {
        let cause: SproutError = ApplicationError::FilesystemError {
            path: PathBuf::from("/out/.gitignore"),
            reason: "denied".into(),
        }
        .into();
        let err: SproutError = ApplicationError::step(ProvisionStep::CopyHiddenFiles, cause).into();
        assert_eq!(err.failed_step(), Some(ProvisionStep::CopyHiddenFiles));
        assert!(!err.is_retryable());
    }

    #[test]
    fn timeout_is_retryable() {
        let err: SproutError = ApplicationError::ProcessTimedOut {
            program: "npm".into(),
            seconds: 5,
        }
        .into();
        assert!(err.is_retryable());
    }
}
