//! Data model for the corral control plane.
//!
//! Pure types only: role definitions, layered option maps, the cluster
//! specification, flex deltas and their CLI-form parsers, live node records
//! and the status snapshot exposed over the control protocol.

mod error;
pub use error::ModelError;

pub mod keys;

mod options;
pub use options::OptionMap;

mod role;
pub use role::RoleSpec;

mod spec;
pub use spec::{ClusterSpec, ERROR_MISSING_MANDATORY_ROLE};

mod flex;
pub use flex::FlexDelta;

mod node;
pub use node::{NodeInfo, NodeState};

mod status;
pub use status::{ClusterStatus, Phase};

/// Name of a role, e.g. `"master"` or `"worker"`.
///
/// A role groups instances that share a launch template and a desired count.
pub type RoleName = String;

/// Desired or live number of instances for a role.
///
/// Zero is valid and means "no running instances", not "role deleted".
pub type InstanceCount = u32;
