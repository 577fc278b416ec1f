//! Sprout Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Sprout
//! project provisioning tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           sprout-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (Provisioner, Installer, ProjectCreator)│
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Driven: Filesystem, ProcessRunner, ..) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     sprout-adapters (Infrastructure)    │
//! │ (LocalFilesystem, TokioProcessRunner)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ProvisionRequest, ManifestSpec, ...)   │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sprout_core::{
//!     application::{AssetSource, Installer, ProjectCreator, Provisioner},
//!     domain::ProvisionRequest,
//! };
//!
//! // 1. Describe the project
//! let request = ProvisionRequest::builder()
//!     .root_path("./my-app")
//!     .name("my-app")
//!     .pinned_version("3.6.8")
//!     .build()?;
//!
//! // 2. Wire services with injected adapters
//! let provisioner = Provisioner::new(filesystem, reporter.clone(), AssetSource::from_root(assets));
//! let installer = Installer::new(runner, reporter.clone(), diagnostics);
//! let creator = ProjectCreator::new(provisioner, installer, reporter);
//!
//! // 3. Create it
//! let created = creator.create(&request, &NoProgress).await?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        AssetSource, Installer, ProjectCreated, ProjectCreator, Provisioned, Provisioner,
        ports::{
            CommandSpec, DiagnosticsSink, Filesystem, LifecycleReporter, NoProgress,
            NoopDiagnostics, NoopReporter, ProcessOutput, ProcessRunner, ProgressSink,
        },
    };
    pub use crate::domain::{
        ConnectionParams, DatabaseClient, InstallFailure, InstallOutcome, LifecycleEvent,
        PackageManager, ProvisionRequest, ProvisionRequestBuilder,
    };
    pub use crate::error::{SproutError, SproutResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
