use tonic::transport::Channel;

use corral_model::{ClusterStatus, FlexDelta, NodeInfo};

use crate::convert::flex_delta_to_proto;
use crate::proto::{self, cluster_protocol_client::ClusterProtocolClient};
use crate::{ApiError, PROTOCOL_NAME};

/// Typed client proxy over the generated gRPC client.
///
/// Every call unwraps the transport-error envelope back into [`ApiError`],
/// so callers see the server's original error classification instead of a
/// bare `tonic::Status`.
#[derive(Clone)]
pub struct ClusterClient {
    inner: ClusterProtocolClient<Channel>,
}

impl ClusterClient {
    /// Connect to a server endpoint, e.g. `"http://127.0.0.1:7051"`.
    pub async fn connect(endpoint: String) -> Result<Self, ApiError> {
        let inner = ClusterProtocolClient::connect(endpoint)
            .await
            .map_err(|e| ApiError::Internal(format!("connect failed: {e}")))?;
        Ok(Self { inner })
    }

    pub fn from_channel(channel: Channel) -> Self {
        Self {
            inner: ClusterProtocolClient::new(channel),
        }
    }

    pub async fn stop_cluster(&mut self, message: &str) -> Result<(), ApiError> {
        self.inner
            .stop_cluster(proto::StopClusterRequest {
                message: message.to_string(),
            })
            .await
            .map_err(ApiError::from_status)?;
        Ok(())
    }

    /// Submit a flex delta. `Ok` means accepted, not reconciled.
    pub async fn flex_cluster(&mut self, delta: &FlexDelta) -> Result<(), ApiError> {
        self.inner
            .flex_cluster(flex_delta_to_proto(delta))
            .await
            .map_err(ApiError::from_status)?;
        Ok(())
    }

    /// The raw JSON snapshot string, as served.
    pub async fn cluster_status_json(&mut self) -> Result<String, ApiError> {
        let response = self
            .inner
            .get_cluster_status(proto::GetClusterStatusRequest {})
            .await
            .map_err(ApiError::from_status)?;
        Ok(response.into_inner().status_json)
    }

    /// The parsed cluster snapshot.
    pub async fn cluster_status(&mut self) -> Result<ClusterStatus, ApiError> {
        let raw = self.cluster_status_json().await?;
        ClusterStatus::from_json_str(&raw).map_err(ApiError::from)
    }

    pub async fn list_node_ids_by_role(&mut self, role: &str) -> Result<Vec<String>, ApiError> {
        let response = self
            .inner
            .list_node_ids_by_role(proto::ListNodeIdsByRoleRequest {
                role: role.to_string(),
            })
            .await
            .map_err(ApiError::from_status)?;
        Ok(response.into_inner().ids)
    }

    pub async fn get_node(&mut self, id: &str) -> Result<NodeInfo, ApiError> {
        let response = self
            .inner
            .get_node(proto::GetNodeRequest { id: id.to_string() })
            .await
            .map_err(ApiError::from_status)?;

        let desc = response
            .into_inner()
            .node
            .ok_or_else(|| ApiError::Internal("missing node in response".into()))?;
        NodeInfo::try_from(desc)
    }

    /// Details for the requested identifiers; identifiers the server does
    /// not track are omitted from the result.
    pub async fn get_cluster_nodes(&mut self, ids: Vec<String>) -> Result<Vec<NodeInfo>, ApiError> {
        let response = self
            .inner
            .get_cluster_nodes(proto::GetClusterNodesRequest { ids })
            .await
            .map_err(ApiError::from_status)?;

        response
            .into_inner()
            .nodes
            .into_iter()
            .map(NodeInfo::try_from)
            .collect()
    }

    /// Negotiate: declare our protocol name, get the server's fixed
    /// version identifier back.
    pub async fn protocol_version(&mut self) -> Result<u32, ApiError> {
        let response = self
            .inner
            .get_protocol_version(proto::GetProtocolVersionRequest {
                protocol: PROTOCOL_NAME.to_string(),
            })
            .await
            .map_err(ApiError::from_status)?;
        Ok(response.into_inner().version)
    }
}
