use std::time::{Duration, UNIX_EPOCH};

use tracing::warn;

use corral_model::{FlexDelta, NodeInfo, NodeState};

use crate::ApiError;
use crate::proto;

impl From<NodeState> for proto::NodeState {
    fn from(state: NodeState) -> Self {
        match state {
            NodeState::Requested => proto::NodeState::Requested,
            NodeState::Live => proto::NodeState::Live,
            NodeState::Released => proto::NodeState::Released,
            NodeState::Failed => proto::NodeState::Failed,
        }
    }
}

impl TryFrom<proto::NodeState> for NodeState {
    type Error = ApiError;

    fn try_from(state: proto::NodeState) -> Result<Self, Self::Error> {
        match state {
            proto::NodeState::Requested => Ok(NodeState::Requested),
            proto::NodeState::Live => Ok(NodeState::Live),
            proto::NodeState::Released => Ok(NodeState::Released),
            proto::NodeState::Failed => Ok(NodeState::Failed),
            proto::NodeState::Unspecified => {
                Err(ApiError::InvalidRequest("node state is unspecified".into()))
            }
        }
    }
}

impl From<NodeInfo> for proto::NodeDescription {
    fn from(node: NodeInfo) -> Self {
        let started_at = node
            .started_at
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|e| {
                warn!(node_id = %node.id, error = %e,
                      "started_at is before unix epoch, defaulting to 0");
                Duration::ZERO
            })
            .as_secs();

        proto::NodeDescription {
            id: node.id,
            role: node.role,
            state: proto::NodeState::from(node.state) as i32,
            host: node.host.unwrap_or_default(),
            started_at,
        }
    }
}

impl TryFrom<proto::NodeDescription> for NodeInfo {
    type Error = ApiError;

    fn try_from(desc: proto::NodeDescription) -> Result<Self, Self::Error> {
        let state = proto::NodeState::try_from(desc.state)
            .map_err(|_| ApiError::InvalidRequest(format!("invalid node state {}", desc.state)))?;

        let mut node = NodeInfo::new(desc.id, desc.role);
        node.state = NodeState::try_from(state)?;
        node.started_at = UNIX_EPOCH
            .checked_add(Duration::from_secs(desc.started_at))
            .ok_or_else(|| {
                ApiError::InvalidRequest(format!("started_at out of range: {}", desc.started_at))
            })?;
        if !desc.host.is_empty() {
            node.host = Some(desc.host);
        }
        Ok(node)
    }
}

/// Decode a flex request into the validated delta form.
pub(crate) fn flex_delta_from_proto(req: proto::FlexClusterRequest) -> Result<FlexDelta, ApiError> {
    let mut delta = FlexDelta::new();
    for role_count in req.roles {
        if role_count.name.trim().is_empty() {
            return Err(ApiError::InvalidRequest("role name cannot be empty".into()));
        }
        delta.set(role_count.name, role_count.count);
    }
    Ok(delta)
}

pub(crate) fn flex_delta_to_proto(delta: &FlexDelta) -> proto::FlexClusterRequest {
    proto::FlexClusterRequest {
        roles: delta
            .iter()
            .map(|(name, count)| proto::RoleCount {
                name: name.to_string(),
                count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flex_request_roundtrip() {
        let delta = FlexDelta::from_pairs("master=1,worker=3").unwrap();
        let req = flex_delta_to_proto(&delta);
        let back = flex_delta_from_proto(req).unwrap();
        assert_eq!(back, delta);
    }

    #[test]
    fn empty_role_name_is_rejected() {
        let req = proto::FlexClusterRequest {
            roles: vec![proto::RoleCount {
                name: "  ".into(),
                count: 1,
            }],
        };
        let err = flex_delta_from_proto(req).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn node_description_roundtrip() {
        let node = NodeInfo::new("c-9", "worker").with_host("host-3");
        let desc = proto::NodeDescription::from(node.clone());
        let back = NodeInfo::try_from(desc).unwrap();

        assert_eq!(back.id, node.id);
        assert_eq!(back.role, node.role);
        assert_eq!(back.state, node.state);
        assert_eq!(back.host, node.host);
    }

    #[test]
    fn out_of_range_started_at_is_invalid_request() {
        let desc = proto::NodeDescription {
            id: "c-1".into(),
            role: "worker".into(),
            state: proto::NodeState::Live as i32,
            host: String::new(),
            started_at: u64::MAX,
        };
        let err = NodeInfo::try_from(desc).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn unspecified_state_is_invalid() {
        let desc = proto::NodeDescription {
            id: "c-1".into(),
            role: "worker".into(),
            state: proto::NodeState::Unspecified as i32,
            host: String::new(),
            started_at: 0,
        };
        assert!(NodeInfo::try_from(desc).is_err());
    }
}
