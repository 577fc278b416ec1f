//! Install Service - runs the package manager in a provisioned project.
//!
//! Failure here is soft: the project stays on disk, the failure is reported
//! and returned as [`InstallOutcome::Failed`] with a retry command.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::{
    application::ports::{
        CommandSpec, DiagnosticsSink, LifecycleReporter, ProcessRunner, ProgressSink,
    },
    domain::{EventScope, InstallFailure, InstallOutcome, LifecycleEvent, ProvisionRequest},
};

/// Event name used when handing stderr to the diagnostics sink.
const INSTALL_FAILED_EVENT: &str = "installFailed";

pub struct Installer {
    runner: Arc<dyn ProcessRunner>,
    reporter: Arc<dyn LifecycleReporter>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    timeout: Option<Duration>,
}

impl Installer {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        reporter: Arc<dyn LifecycleReporter>,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        Self {
            runner,
            reporter,
            diagnostics,
            timeout: None,
        }
    }

    /// Kill the install after `timeout`. `None` (the default) waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The command that installs dependencies for `request`.
    pub fn command_for(&self, request: &ProvisionRequest) -> CommandSpec {
        let package_manager = request.package_manager();
        CommandSpec {
            program: package_manager.binary().to_string(),
            args: package_manager.install_args(),
            cwd: request.root_path().to_path_buf(),
            timeout: self.timeout,
        }
    }

    /// Install dependencies. Never fails the overall operation.
    #[instrument(skip_all, fields(package_manager = %request.package_manager()))]
    pub async fn install(
        &self,
        request: &ProvisionRequest,
        progress: &dyn ProgressSink,
    ) -> InstallOutcome {
        if request.skip_install() {
            info!("Skipping dependency install");
            return InstallOutcome::Skipped;
        }

        let command = self.command_for(request);
        let scope = EventScope::from(request);
        info!(command = %command.display(), "Installing dependencies");

        let single_line = SingleLine(progress);
        let failure = match self.runner.run(&command, &single_line).await {
            Ok(output) if output.success => {
                info!("Dependencies installed");
                self.reporter
                    .emit(&LifecycleEvent::InstallSucceeded { scope });
                return InstallOutcome::Installed;
            }
            Ok(output) => InstallFailure {
                root_path: request.root_path().to_path_buf(),
                package_manager: request.package_manager(),
                exit_code: output.code,
                reason: match output.code {
                    Some(code) => format!("{} exited with status {code}", command.program),
                    None => format!("{} was terminated by a signal", command.program),
                },
                stderr: output.stderr,
            },
            Err(e) => InstallFailure {
                root_path: request.root_path().to_path_buf(),
                package_manager: request.package_manager(),
                exit_code: None,
                reason: e.to_string(),
                stderr: e.to_string(),
            },
        };

        warn!(reason = %failure.reason, "Dependency install failed");
        self.reporter
            .emit(&LifecycleEvent::install_failed(scope, &failure.stderr));
        self.diagnostics
            .capture_stderr(INSTALL_FAILED_EVENT, &failure);

        InstallOutcome::Failed(failure)
    }
}

/// Forwards progress with newlines collapsed so it fits on one line.
struct SingleLine<'a>(&'a dyn ProgressSink);

impl ProgressSink for SingleLine<'_> {
    fn report(&self, chunk: &str) {
        self.0.report(&collapse_newlines(chunk));
    }
}

fn collapse_newlines(chunk: &str) -> String {
    chunk.replace("\r\n", " ").replace('\n', " ")
}
