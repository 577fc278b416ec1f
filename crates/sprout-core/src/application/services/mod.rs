//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "provision a project" or "install dependencies".

pub mod create_service;
pub mod install_service;
pub mod provision_service;

pub use create_service::{ProjectCreated, ProjectCreator};
pub use install_service::Installer;
pub use provision_service::{AssetSource, Provisioned, Provisioner};
