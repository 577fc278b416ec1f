//! Infrastructure adapters for Sprout.
//!
//! This crate implements the ports defined in `sprout-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod process;
pub mod reporter;
pub mod resources;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::{ScriptedRunner, TokioProcessRunner};
pub use reporter::{RecordingDiagnostics, RecordingReporter, TracingDiagnostics, TracingReporter};
pub use resources::{RESOURCES_DIR_ENV, bundled_assets, resolve_assets};
