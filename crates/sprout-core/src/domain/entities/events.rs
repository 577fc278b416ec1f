use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    entities::{install::tail_bytes, install::STDERR_TAIL_BYTES, request::ProvisionRequest},
    value_objects::{DatabaseClient, PackageManager},
};

/// Snapshot of the request attached to every lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventScope {
    pub name: String,
    pub uuid: Uuid,
    pub root_path: PathBuf,
    pub client: DatabaseClient,
    pub package_manager: PackageManager,
    pub docs: bool,
}

impl From<&ProvisionRequest> for EventScope {
    fn from(request: &ProvisionRequest) -> Self {
        Self {
            name: request.name().to_string(),
            uuid: request.uuid(),
            root_path: request.root_path().to_path_buf(),
            client: request.client(),
            package_manager: request.package_manager(),
            docs: request.docs(),
        }
    }
}

/// Events emitted while a project is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    FilesCopied { scope: EventScope },
    PackageManifestWritten { scope: EventScope },
    ConfigFilesWritten { scope: EventScope },
    InstallStarting { scope: EventScope },
    InstallSucceeded { scope: EventScope },
    InstallFailed {
        scope: EventScope,
        /// At most [`STDERR_TAIL_BYTES`] of trailing stderr.
        truncated_stderr: String,
    },
    OperationCompleted { scope: EventScope },
}

impl LifecycleEvent {
    /// Build an `InstallFailed` event, truncating stderr.
    pub fn install_failed(scope: EventScope, stderr: &str) -> Self {
        Self::InstallFailed {
            scope,
            truncated_stderr: tail_bytes(stderr, STDERR_TAIL_BYTES).to_string(),
        }
    }

    /// Wire name of the event.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FilesCopied { .. } => "filesCopied",
            Self::PackageManifestWritten { .. } => "packageManifestWritten",
            Self::ConfigFilesWritten { .. } => "configFilesWritten",
            Self::InstallStarting { .. } => "installStarting",
            Self::InstallSucceeded { .. } => "installSucceeded",
            Self::InstallFailed { .. } => "installFailed",
            Self::OperationCompleted { .. } => "operationCompleted",
        }
    }

    pub fn scope(&self) -> &EventScope {
        match self {
            Self::FilesCopied { scope }
            | Self::PackageManifestWritten { scope }
            | Self::ConfigFilesWritten { scope }
            | Self::InstallStarting { scope }
            | Self::InstallSucceeded { scope }
            | Self::InstallFailed { scope, .. }
            | Self::OperationCompleted { scope } => scope,
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> EventScope {
        let request = ProvisionRequest::builder()
            .root_path("/tmp/app")
            .name("app")
            .pinned_version("1.0.0")
            .build()
            .unwrap();
        EventScope::from(&request)
    }

    #[test]
    fn install_failed_truncates_stderr() {
        let stderr = "e".repeat(3000);
        let event = LifecycleEvent::install_failed(scope(), &stderr);

        match event {
            LifecycleEvent::InstallFailed { truncated_stderr, .. } => {
                assert_eq!(truncated_stderr.len(), STDERR_TAIL_BYTES)
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn names_match_vocabulary() {
        assert_eq!(LifecycleEvent::FilesCopied { scope: scope() }.name(), "filesCopied");
        assert_eq!(
            LifecycleEvent::OperationCompleted { scope: scope() }.to_string(),
            "operationCompleted"
        );
    }
}
