// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Sprout.
//!
//! Pure logic only: the provisioning request, the manifest it derives, the
//! config file renderers and the lifecycle vocabulary. All I/O goes through
//! ports defined in the application layer.
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, process, or network calls
//! - **Immutable entities**: Requests are built once and only read
pub mod config_files;
pub mod entities;
pub mod error;
pub mod layout;
pub mod naming;
pub mod value_objects;

pub use config_files::{render_database_config, render_docs_config};
pub use entities::{
    ConnectionParams, EventScope, InstallFailure, InstallOutcome, LifecycleEvent, ManifestSpec,
    ProvisionRequest, ProvisionRequestBuilder, STDERR_TAIL_BYTES, manifest::render_manifest,
};
pub use error::{DomainError, ErrorCategory};
pub use naming::to_kebab_case;
pub use value_objects::{DatabaseClient, PackageManager};
