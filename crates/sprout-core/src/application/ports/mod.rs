//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `sprout-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `ProcessRunner`: Package manager invocation
//!   - `LifecycleReporter`, `DiagnosticsSink`, `ProgressSink`: reporting
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    CommandSpec, DiagnosticsSink, Filesystem, LifecycleReporter, NoProgress, NoopDiagnostics,
    NoopReporter, ProcessOutput, ProcessRunner, ProgressSink,
};

#[cfg(test)]
pub use output::{MockDiagnosticsSink, MockLifecycleReporter};
