use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    error::DomainError,
    naming::to_kebab_case,
    value_objects::{DatabaseClient, PackageManager},
};

/// Connection parameters handed to the database config renderer.
///
/// Opaque to the core: keys and values are written through unchanged.
/// Ordered so rendering is deterministic.
pub type ConnectionParams = BTreeMap<String, Value>;

/// Everything needed to create one project.
///
/// Built once through [`ProvisionRequestBuilder`] and then only read. All
/// fields are private; there are no setters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionRequest {
    root_path: PathBuf,
    name: String,
    uuid: Uuid,
    client: DatabaseClient,
    connection: ConnectionParams,
    pinned_dependencies: Vec<String>,
    additional_dependencies: BTreeMap<String, String>,
    pinned_version: String,
    docs: bool,
    package_manager: PackageManager,
    skip_install: bool,
}

impl ProvisionRequest {
    pub fn builder() -> ProvisionRequestBuilder {
        ProvisionRequestBuilder::default()
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kebab-cased application name, used as the package name.
    pub fn package_name(&self) -> String {
        to_kebab_case(&self.name)
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn client(&self) -> DatabaseClient {
        self.client
    }

    pub fn connection(&self) -> &ConnectionParams {
        &self.connection
    }

    pub fn pinned_dependencies(&self) -> &[String] {
        &self.pinned_dependencies
    }

    pub fn additional_dependencies(&self) -> &BTreeMap<String, String> {
        &self.additional_dependencies
    }

    pub fn pinned_version(&self) -> &str {
        &self.pinned_version
    }

    pub fn docs(&self) -> bool {
        self.docs
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    pub fn skip_install(&self) -> bool {
        self.skip_install
    }
}

impl fmt::Display for ProvisionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}) at {}",
            self.name,
            self.client,
            self.package_manager,
            self.root_path.display()
        )
    }
}

/// Builder for [`ProvisionRequest`].
///
/// `root_path`, `name` and `pinned_version` are required. A fresh v4 UUID
/// is generated when none is given.
#[derive(Debug, Default)]
pub struct ProvisionRequestBuilder {
    root_path: Option<PathBuf>,
    name: Option<String>,
    uuid: Option<Uuid>,
    client: DatabaseClient,
    connection: ConnectionParams,
    pinned_dependencies: Vec<String>,
    additional_dependencies: BTreeMap<String, String>,
    pinned_version: Option<String>,
    docs: bool,
    package_manager: PackageManager,
    skip_install: bool,
}

impl ProvisionRequestBuilder {
    pub fn root_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_path = Some(path.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    pub fn client(mut self, client: DatabaseClient) -> Self {
        self.client = client;
        self
    }

    pub fn connection(mut self, connection: ConnectionParams) -> Self {
        self.connection = connection;
        self
    }

    pub fn connection_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.connection.insert(key.into(), value.into());
        self
    }

    pub fn pinned_dependencies<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pinned_dependencies = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn additional_dependency(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.additional_dependencies.insert(name.into(), version.into());
        self
    }

    pub fn additional_dependencies(mut self, deps: BTreeMap<String, String>) -> Self {
        self.additional_dependencies = deps;
        self
    }

    pub fn pinned_version(mut self, version: impl Into<String>) -> Self {
        self.pinned_version = Some(version.into());
        self
    }

    pub fn docs(mut self, docs: bool) -> Self {
        self.docs = docs;
        self
    }

    pub fn package_manager(mut self, package_manager: PackageManager) -> Self {
        self.package_manager = package_manager;
        self
    }

    pub fn use_alternate_package_manager(mut self, use_alternate: bool) -> Self {
        self.package_manager = PackageManager::from_alternate_flag(use_alternate);
        self
    }

    pub fn skip_install(mut self, skip: bool) -> Self {
        self.skip_install = skip;
        self
    }

    pub fn build(self) -> Result<ProvisionRequest, DomainError> {
        let root_path = self
            .root_path
            .ok_or(DomainError::MissingRequiredField { field: "root_path" })?;
        if root_path.as_os_str().is_empty() {
            return Err(DomainError::InvalidRequest(
                "target path cannot be empty".into(),
            ));
        }

        let name = self
            .name
            .ok_or(DomainError::MissingRequiredField { field: "name" })?;
        if to_kebab_case(&name).is_empty() {
            return Err(DomainError::InvalidRequest(format!(
                "application name '{name}' has no usable characters"
            )));
        }

        let pinned_version = self
            .pinned_version
            .ok_or(DomainError::MissingRequiredField {
                field: "pinned_version",
            })?;
        if pinned_version.trim().is_empty() {
            return Err(DomainError::InvalidRequest(
                "pinned version cannot be empty".into(),
            ));
        }

        for dep in &self.pinned_dependencies {
            validate_dependency_name(dep)?;
        }
        for (dep, version) in &self.additional_dependencies {
            validate_dependency_name(dep)?;
            if version.trim().is_empty() {
                return Err(DomainError::InvalidDependency {
                    name: dep.clone(),
                    reason: "version cannot be empty".into(),
                });
            }
        }

        Ok(ProvisionRequest {
            root_path,
            name,
            uuid: self.uuid.unwrap_or_else(Uuid::new_v4),
            client: self.client,
            connection: self.connection,
            pinned_dependencies: self.pinned_dependencies,
            additional_dependencies: self.additional_dependencies,
            pinned_version,
            docs: self.docs,
            package_manager: self.package_manager,
            skip_install: self.skip_install,
        })
    }
}

fn validate_dependency_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::InvalidDependency {
            name: name.into(),
            reason: "name cannot be empty".into(),
        });
    }
    if name.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidDependency {
            name: name.into(),
            reason: "name cannot contain whitespace".into(),
        });
    }
    Ok(())
}
