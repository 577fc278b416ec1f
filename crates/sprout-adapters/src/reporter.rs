//! Lifecycle reporting adapters.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use sprout_core::{
    application::ports::{DiagnosticsSink, LifecycleReporter},
    domain::{InstallFailure, LifecycleEvent},
};

/// Emits lifecycle events as structured `tracing` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl LifecycleReporter for TracingReporter {
    fn emit(&self, event: &LifecycleEvent) {
        let scope = event.scope();
        match event {
            LifecycleEvent::InstallFailed {
                truncated_stderr, ..
            } => warn!(
                target: "sprout::lifecycle",
                event = event.name(),
                project = %scope.name,
                uuid = %scope.uuid,
                client = %scope.client,
                package_manager = %scope.package_manager,
                stderr = %truncated_stderr,
                "lifecycle"
            ),
            _ => info!(
                target: "sprout::lifecycle",
                event = event.name(),
                project = %scope.name,
                uuid = %scope.uuid,
                client = %scope.client,
                package_manager = %scope.package_manager,
                docs = scope.docs,
                "lifecycle"
            ),
        }
    }
}

/// Writes the full install stderr to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn capture_stderr(&self, event: &str, failure: &InstallFailure) {
        warn!(
            target: "sprout::diagnostics",
            event,
            root = %failure.root_path.display(),
            exit_code = ?failure.exit_code,
            stderr = %failure.stderr,
            "captured install stderr"
        );
    }
}

/// Keeps every emitted event (testing helper).
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<LifecycleEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Wire names of the emitted events, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(LifecycleEvent::name).collect()
    }
}

impl LifecycleReporter for RecordingReporter {
    fn emit(&self, event: &LifecycleEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Keeps every captured failure (testing helper).
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
    captured: Arc<Mutex<Vec<(String, InstallFailure)>>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captured(&self) -> Vec<(String, InstallFailure)> {
        self.captured.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn capture_stderr(&self, event: &str, failure: &InstallFailure) {
        if let Ok(mut captured) = self.captured.lock() {
            captured.push((event.to_string(), failure.clone()));
        }
    }
}
