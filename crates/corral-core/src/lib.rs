//! Desired/live state engine of the corral control plane.
//!
//! [`ClusterState`] holds the authoritative specification plus the registry
//! of tracked container instances; the control protocol mutates it through
//! validated flex deltas and reads consistent snapshots from it. The
//! [`Provider`] trait is the polymorphism point for application-specific
//! launch logic; the engine never branches on the concrete application type.

pub mod error;
pub use error::CoreError;

pub mod state;
pub use state::ClusterState;

pub mod provider;
pub use provider::{ERROR_UNKNOWN_ROLE, Provider, ProviderError, seed_roles};

pub mod launch;
pub use launch::prepare_container_launch;
