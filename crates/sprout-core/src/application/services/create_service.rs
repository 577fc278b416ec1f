//! Create Service - the full "new project" use case.
//!
//! Provision first (hard failure, rolled back), then install (soft failure,
//! project kept).

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{
        ports::{LifecycleReporter, ProgressSink},
        services::{install_service::Installer, provision_service::Provisioner},
    },
    domain::{EventScope, InstallOutcome, LifecycleEvent, PackageManager, ProvisionRequest},
    error::SproutResult,
};

/// A project that exists on disk. Dependencies may or may not be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCreated {
    pub root: PathBuf,
    pub package_manager: PackageManager,
    pub docs: bool,
    pub install: InstallOutcome,
}

impl ProjectCreated {
    /// Scripts the user can run next, as `(command, description)` pairs.
    pub fn available_commands(&self) -> Vec<(String, &'static str)> {
        let run = self.package_manager.run_prefix();
        let mut commands = vec![
            (
                format!("{run} develop"),
                "Start Strapi in watch mode.",
            ),
            (
                format!("{run} start"),
                "Start Strapi without watch mode.",
            ),
            (
                format!("{run} build"),
                "Build Strapi admin panel.",
            ),
            (
                format!("{run} strapi"),
                "Display all available commands.",
            ),
        ];
        if self.docs {
            commands.push((format!("{run} monitor"), "Monitor API traffic with Optic."));
            commands.push((format!("{run} spec"), "Document your API with Optic."));
        }
        commands
    }
}

/// Orchestrates provisioning and install for one request.
pub struct ProjectCreator {
    provisioner: Provisioner,
    installer: Installer,
    reporter: Arc<dyn LifecycleReporter>,
}

impl ProjectCreator {
    pub fn new(
        provisioner: Provisioner,
        installer: Installer,
        reporter: Arc<dyn LifecycleReporter>,
    ) -> Self {
        Self {
            provisioner,
            installer,
            reporter,
        }
    }

    /// Create the project. Errors only if provisioning failed, in which case
    /// nothing is left at the target path.
    #[instrument(skip_all, fields(project = %request.name()))]
    pub async fn create(
        &self,
        request: &ProvisionRequest,
        progress: &dyn ProgressSink,
    ) -> SproutResult<ProjectCreated> {
        let provisioned = self.provisioner.provision(request).await?;
        let scope = EventScope::from(request);

        if !request.skip_install() {
            self.reporter.emit(&LifecycleEvent::InstallStarting {
                scope: scope.clone(),
            });
        }

        let install = self.installer.install(request, progress).await;

        self.reporter
            .emit(&LifecycleEvent::OperationCompleted { scope });
        info!(installed = install.is_success(), "Project created");

        Ok(ProjectCreated {
            root: provisioned.root,
            package_manager: request.package_manager(),
            docs: request.docs(),
            install,
        })
    }
}
