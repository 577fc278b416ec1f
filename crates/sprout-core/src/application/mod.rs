//! Application layer for Sprout.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (Provisioner, Installer, ProjectCreator)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    AssetSource, Installer, ProjectCreated, ProjectCreator, Provisioned, Provisioner,
};

// Re-export port traits (for adapter implementation)
pub use ports::{DiagnosticsSink, Filesystem, LifecycleReporter, ProcessRunner, ProgressSink};

pub use error::{ApplicationError, ProvisionStep};
