//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `sprout-adapters` crate provides implementations.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{InstallFailure, LifecycleEvent};
use crate::error::SproutResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `sprout_adapters::filesystem::LocalFilesystem` (production)
/// - `sprout_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Every method is a suspension point; callers never block on I/O.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Recursively copy the contents of `from` into `to`, creating `to`
    /// and preserving relative structure.
    async fn copy_dir_all(&self, from: &Path, to: &Path) -> SproutResult<()>;

    /// Names of the regular files directly inside `dir`.
    async fn list_files(&self, dir: &Path) -> SproutResult<Vec<String>>;

    /// Copy one file. The parent of `to` must exist.
    async fn copy_file(&self, from: &Path, to: &Path) -> SproutResult<()>;

    /// Write content to a file, replacing it if present.
    async fn write_file(&self, path: &Path, content: &str) -> SproutResult<()>;

    /// Create a directory and all parent directories. No-op if present.
    async fn create_dir_all(&self, path: &Path) -> SproutResult<()>;

    /// Remove a directory and all contents. No-op if absent.
    async fn remove_dir_all(&self, path: &Path) -> SproutResult<()>;
}

/// A process to run. Standard input is always closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Render as a shell-like string for logs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How a finished process exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    /// `None` when terminated by a signal.
    pub code: Option<i32>,
    /// Everything written to stderr.
    pub stderr: String,
}

/// Port for running external processes.
///
/// Implemented by:
/// - `sprout_adapters::process::TokioProcessRunner` (production)
/// - `sprout_adapters::process::ScriptedRunner` (testing)
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `command` to completion, forwarding every stdout and stderr chunk
    /// to `progress` as it arrives.
    ///
    /// Returns `Err` only if the process could not be started or timed out;
    /// a non-zero exit is reported through [`ProcessOutput`].
    async fn run(&self, command: &CommandSpec, progress: &dyn ProgressSink)
    -> SproutResult<ProcessOutput>;
}

/// Receives raw progress text. Write-only.
pub trait ProgressSink: Send + Sync {
    fn report(&self, chunk: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, chunk: &str) {
        self(chunk)
    }
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _chunk: &str) {}
}

/// Port for lifecycle telemetry and UI.
///
/// Emission is advisory: implementations must not fail, and the core never
/// depends on what they do.
#[cfg_attr(test, mockall::automock)]
pub trait LifecycleReporter: Send + Sync {
    fn emit(&self, event: &LifecycleEvent);
}

/// Reporter used when no collaborator is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl LifecycleReporter for NoopReporter {
    fn emit(&self, _event: &LifecycleEvent) {}
}

/// Port for capturing full install diagnostics (stderr) for later analysis.
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticsSink: Send + Sync {
    fn capture_stderr(&self, event: &str, failure: &InstallFailure);
}

/// Diagnostics sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl DiagnosticsSink for NoopDiagnostics {
    fn capture_stderr(&self, _event: &str, _failure: &InstallFailure) {}
}
