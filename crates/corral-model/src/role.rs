use serde::{Deserialize, Serialize};

use crate::{InstanceCount, OptionMap};

/// Desired state of one named role.
///
/// Roles are created from the initial specification and mutated only
/// through flex operations; they are never deleted. A desired count of
/// zero is a valid steady state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSpec {
    /// Desired number of instances.
    pub desired: InstanceCount,
    /// Role-level options (resource shape, heap, info port, `env.*` overrides).
    #[serde(default, skip_serializing_if = "OptionMap::is_empty")]
    pub options: OptionMap,
}

impl RoleSpec {
    pub fn new(desired: InstanceCount) -> Self {
        Self {
            desired,
            options: OptionMap::new(),
        }
    }

    pub fn with_options(desired: InstanceCount, options: OptionMap) -> Self {
        Self { desired, options }
    }
}
