use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ClusterSpec, InstanceCount, ModelError, RoleName};

/// Cluster lifecycle phase.
///
/// `stop` is the only transition into the terminal branch; flexing overlaps
/// with `Running` and is not a distinct phase in the snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Running,
    Stopping,
    Stopped,
}

/// Point-in-time snapshot of the whole cluster, as served by the status
/// query of the control protocol.
///
/// Serializes to a single JSON string that carries enough to reconstruct
/// both the role -> desired-count and role -> instance-id views.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    /// The full declarative specification at snapshot time.
    pub spec: ClusterSpec,
    /// Live instance identifiers per role.
    #[serde(default)]
    pub live: BTreeMap<RoleName, Vec<String>>,
    /// Lifecycle phase at snapshot time.
    pub phase: Phase,
}

impl ClusterStatus {
    /// Serialize into the wire form of the status query.
    pub fn to_json_string(&self) -> Result<String, ModelError> {
        serde_json::to_string(self)
            .map_err(|e| ModelError::BadConfig(format!("status serialization failed: {e}")))
    }

    /// Parse a status string produced by [`Self::to_json_string`].
    pub fn from_json_str(raw: &str) -> Result<Self, ModelError> {
        serde_json::from_str(raw)
            .map_err(|e| ModelError::BadArgument(format!("malformed status payload: {e}")))
    }

    /// Desired counts as recorded in the snapshot's specification.
    pub fn desired_counts(&self) -> BTreeMap<RoleName, InstanceCount> {
        self.spec.desired_counts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoleSpec;

    #[test]
    fn status_json_roundtrip_preserves_desired_counts() {
        let mut spec = ClusterSpec::new("demo");
        spec.add_role("master", RoleSpec::new(1));
        spec.add_role("worker", RoleSpec::new(3));

        let mut live = BTreeMap::new();
        live.insert("worker".to_string(), vec!["c-1".into(), "c-2".into()]);

        let status = ClusterStatus {
            spec: spec.clone(),
            live,
            phase: Phase::Running,
        };

        let json = status.to_json_string().unwrap();
        let back = ClusterStatus::from_json_str(&json).unwrap();

        assert_eq!(back.desired_counts(), spec.desired_counts());
        assert_eq!(back.live.get("worker").map(Vec::len), Some(2));
        assert_eq!(back.phase, Phase::Running);
    }

    #[test]
    fn malformed_status_is_bad_argument() {
        let err = ClusterStatus::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ModelError::BadArgument(_)));
    }
}
