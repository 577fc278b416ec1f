pub mod events;
pub mod install;
pub mod manifest;
pub mod request;

pub use events::{EventScope, LifecycleEvent};
pub use install::{InstallFailure, InstallOutcome, STDERR_TAIL_BYTES};
pub use manifest::ManifestSpec;
pub use request::{ConnectionParams, ProvisionRequest, ProvisionRequestBuilder};
