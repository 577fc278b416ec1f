// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so they can be carried inside step failures)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Invalid dependency '{name}': {reason}")]
    InvalidDependency { name: String, reason: String },

    #[error("Unsupported database client '{0}'")]
    UnsupportedDatabaseClient(String),

    #[error("Unknown package manager '{0}'")]
    UnknownPackageManager(String),

    // ========================================================================
    // Rendering
    // ========================================================================
    #[error("Failed to render {artifact}: {reason}")]
    RenderFailed {
        artifact: &'static str,
        reason: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidRequest(msg) => vec![
                "Check the project options".into(),
                format!("Details: {}", msg),
            ],
            Self::MissingRequiredField { field } => {
                vec![format!("Provide a value for '{}'", field)]
            }
            Self::InvalidDependency { name, .. } => vec![
                format!("Dependency '{}' is malformed", name),
                "Use the form name@version, e.g. lodash@4.17.21".into(),
            ],
            Self::UnsupportedDatabaseClient(_) => vec![
                "Supported database clients:".into(),
                "  • sqlite".into(),
                "  • postgres".into(),
                "  • mysql".into(),
                "  • mongo".into(),
            ],
            Self::UnknownPackageManager(_) => vec!["Use either 'npm' or 'yarn'".into()],
            Self::RenderFailed { .. } => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRequest(_)
            | Self::MissingRequiredField { .. }
            | Self::InvalidDependency { .. } => ErrorCategory::Validation,
            Self::UnsupportedDatabaseClient(_) | Self::UnknownPackageManager(_) => {
                ErrorCategory::Compatibility
            }
            Self::RenderFailed { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Internal,
}
