use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::RoleName;

/// Lifecycle state of one container instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeState {
    /// Requested from the resource manager, not yet granted.
    Requested,
    /// Granted and running.
    Live,
    /// Released back to the resource manager.
    Released,
    /// The container failed.
    Failed,
}

/// Detailed information about one tracked container instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    /// Unique instance identifier, assigned by the resource manager or
    /// generated at request time.
    pub id: String,
    /// Role this instance belongs to.
    pub role: RoleName,
    /// Current lifecycle state.
    pub state: NodeState,
    /// Host the container landed on, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// When the instance entered the registry.
    #[serde(with = "time_serde")]
    pub started_at: SystemTime,
}

impl NodeInfo {
    pub fn new(id: impl Into<String>, role: impl Into<RoleName>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            state: NodeState::Requested,
            host: None,
            started_at: SystemTime::now(),
        }
    }

    /// New record with a generated UUID, for request-time tracking before
    /// the resource manager has assigned its own identifier.
    pub fn with_generated_id(role: impl Into<RoleName>) -> Self {
        Self::new(Uuid::new_v4().to_string(), role)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
}

mod time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let since_epoch = time
            .duration_since(UNIX_EPOCH)
            .map_err(serde::ser::Error::custom)?;
        since_epoch.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        UNIX_EPOCH
            .checked_add(std::time::Duration::from_secs(secs))
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {secs}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_info_serde_roundtrip() {
        let node = NodeInfo::new("c-001", "worker").with_host("node7");
        let json = serde_json::to_string(&node).unwrap();
        let back: NodeInfo = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, node.id);
        assert_eq!(back.role, node.role);
        assert_eq!(back.state, NodeState::Requested);
        assert_eq!(back.host.as_deref(), Some("node7"));
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = NodeInfo::with_generated_id("worker");
        let b = NodeInfo::with_generated_id("worker");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn out_of_range_started_at_is_rejected() {
        let json = format!(
            r#"{{"id":"c-3","role":"worker","state":"requested","startedAt":{}}}"#,
            u64::MAX
        );
        let err = serde_json::from_str::<NodeInfo>(&json).unwrap_err();
        assert!(err.to_string().contains("timestamp out of range"));
    }

    #[test]
    fn absent_host_is_not_serialized() {
        let node = NodeInfo::new("c-002", "master");
        let json = serde_json::to_string(&node).unwrap();
        assert!(!json.contains("host"));
    }
}
