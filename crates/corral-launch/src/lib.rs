//! Container launch preparation.
//!
//! [`ContainerLauncher`] accumulates one container's launch descriptor
//! across contributors and finalizes it exactly once into an immutable
//! [`LaunchContext`]. Filesystem staging and credential serialization are
//! collaborator traits; this crate treats their outputs as opaque.

mod error;
pub use error::LaunchError;

mod resource;
pub use resource::{LocalResource, ResourceKind, ResourceShape, ServiceData};

mod staging;
pub use staging::StagingFs;

mod credentials;
pub use credentials::{CredentialSource, InsecureCredentials};

mod launcher;
pub use launcher::{
    ContainerLauncher, LaunchContext, PROPAGATED_USER_ENV, extract_resource_requirements,
};
