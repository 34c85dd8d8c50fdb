use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::info;

use crate::convert::flex_delta_from_proto;
use crate::handler::ClusterHandler;
use crate::proto::{self, cluster_protocol_server::ClusterProtocol};
use crate::{PROTOCOL_NAME, PROTOCOL_VERSION, check_protocol};

/// gRPC service implementation.
///
/// Wraps a [`ClusterHandler`] and implements the generated
/// `ClusterProtocol` trait; every application error is mapped to a
/// `Status` carrying its classification in the metadata.
pub struct ClusterProtocolService<H> {
    handler: Arc<H>,
}

impl<H> ClusterProtocolService<H>
where
    H: ClusterHandler,
{
    /// Create a new gRPC service with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }
}

#[tonic::async_trait]
impl<H> ClusterProtocol for ClusterProtocolService<H>
where
    H: ClusterHandler,
{
    async fn stop_cluster(
        &self,
        request: Request<proto::StopClusterRequest>,
    ) -> Result<Response<proto::StopClusterResponse>, Status> {
        let req = request.into_inner();
        if !req.message.is_empty() {
            info!(reason = %req.message, "stop requested");
        }
        self.handler.stop_cluster().await.map_err(Status::from)?;
        Ok(Response::new(proto::StopClusterResponse {}))
    }

    async fn flex_cluster(
        &self,
        request: Request<proto::FlexClusterRequest>,
    ) -> Result<Response<proto::FlexClusterResponse>, Status> {
        let delta = flex_delta_from_proto(request.into_inner()).map_err(Status::from)?;

        self.handler
            .flex_cluster(delta)
            .await
            .map_err(Status::from)?;

        // Acceptance only: reconciliation catches up asynchronously.
        Ok(Response::new(proto::FlexClusterResponse { accepted: true }))
    }

    async fn get_cluster_status(
        &self,
        _request: Request<proto::GetClusterStatusRequest>,
    ) -> Result<Response<proto::GetClusterStatusResponse>, Status> {
        let status = self.handler.cluster_status().await.map_err(Status::from)?;
        let status_json = status
            .to_json_string()
            .map_err(|e| Status::from(crate::ApiError::from(e)))?;

        Ok(Response::new(proto::GetClusterStatusResponse {
            status_json,
        }))
    }

    async fn list_node_ids_by_role(
        &self,
        request: Request<proto::ListNodeIdsByRoleRequest>,
    ) -> Result<Response<proto::ListNodeIdsByRoleResponse>, Status> {
        let req = request.into_inner();

        let ids = self
            .handler
            .list_node_ids_by_role(&req.role)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(proto::ListNodeIdsByRoleResponse { ids }))
    }

    async fn get_node(
        &self,
        request: Request<proto::GetNodeRequest>,
    ) -> Result<Response<proto::GetNodeResponse>, Status> {
        let req = request.into_inner();

        if req.id.trim().is_empty() {
            return Err(Status::invalid_argument("node id cannot be empty"));
        }

        let node = self.handler.get_node(&req.id).await.map_err(Status::from)?;

        Ok(Response::new(proto::GetNodeResponse {
            node: Some(node.into()),
        }))
    }

    async fn get_cluster_nodes(
        &self,
        request: Request<proto::GetClusterNodesRequest>,
    ) -> Result<Response<proto::GetClusterNodesResponse>, Status> {
        let req = request.into_inner();

        let nodes = self
            .handler
            .get_cluster_nodes(&req.ids)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(proto::GetClusterNodesResponse {
            nodes: nodes.into_iter().map(Into::into).collect(),
        }))
    }

    async fn get_protocol_version(
        &self,
        request: Request<proto::GetProtocolVersionRequest>,
    ) -> Result<Response<proto::GetProtocolVersionResponse>, Status> {
        let req = request.into_inner();
        check_protocol(&req.protocol).map_err(Status::from)?;

        Ok(Response::new(proto::GetProtocolVersionResponse {
            protocol: PROTOCOL_NAME.to_string(),
            version: PROTOCOL_VERSION,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClusterStateAdapter;
    use corral_core::ClusterState;
    use corral_model::{ClusterSpec, ClusterStatus, NodeInfo, RoleSpec};

    fn service() -> ClusterProtocolService<ClusterStateAdapter> {
        let mut spec = ClusterSpec::new("demo");
        spec.add_role("master", RoleSpec::new(1));
        spec.add_role("worker", RoleSpec::new(3));

        let state = ClusterState::new(spec);
        state.register_node(NodeInfo::new("c-1", "worker")).unwrap();

        ClusterProtocolService::new(Arc::new(ClusterStateAdapter::new(state)))
    }

    fn flex_request(pairs: &[(&str, u32)]) -> proto::FlexClusterRequest {
        proto::FlexClusterRequest {
            roles: pairs
                .iter()
                .map(|(name, count)| proto::RoleCount {
                    name: name.to_string(),
                    count: *count,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn flex_accepts_and_records_desired_state() {
        let service = service();

        let response = service
            .flex_cluster(Request::new(flex_request(&[("worker", 5)])))
            .await
            .unwrap();
        assert!(response.get_ref().accepted);

        let status = service
            .get_cluster_status(Request::new(proto::GetClusterStatusRequest {}))
            .await
            .unwrap();
        let parsed = ClusterStatus::from_json_str(&status.get_ref().status_json).unwrap();
        assert_eq!(parsed.desired_counts().get("worker"), Some(&5));
    }

    #[tokio::test]
    async fn flex_unknown_role_is_invalid_argument() {
        let service = service();

        let status = service
            .flex_cluster(Request::new(flex_request(&[("worker", 5), ("ghost", 1)])))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        // All-or-nothing: the valid part of the delta was not applied.
        let snapshot = service
            .get_cluster_status(Request::new(proto::GetClusterStatusRequest {}))
            .await
            .unwrap();
        let parsed = ClusterStatus::from_json_str(&snapshot.get_ref().status_json).unwrap();
        assert_eq!(parsed.desired_counts().get("worker"), Some(&3));
    }

    #[tokio::test]
    async fn list_node_ids_by_role_strict_vs_partial_lookup() {
        let service = service();

        let ids = service
            .list_node_ids_by_role(Request::new(proto::ListNodeIdsByRoleRequest {
                role: "worker".into(),
            }))
            .await
            .unwrap();
        assert_eq!(ids.get_ref().ids, vec!["c-1"]);

        let err = service
            .list_node_ids_by_role(Request::new(proto::ListNodeIdsByRoleRequest {
                role: "ghost".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), tonic::Code::InvalidArgument);

        let nodes = service
            .get_cluster_nodes(Request::new(proto::GetClusterNodesRequest {
                ids: vec!["c-1".into(), "unknown".into()],
            }))
            .await
            .unwrap();
        assert_eq!(nodes.get_ref().nodes.len(), 1);
    }

    #[tokio::test]
    async fn get_node_unknown_id_is_not_found() {
        let service = service();

        let err = service
            .get_node(Request::new(proto::GetNodeRequest { id: "nope".into() }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn stop_then_flex_is_failed_precondition() {
        let service = service();

        service
            .stop_cluster(Request::new(proto::StopClusterRequest {
                message: "maintenance".into(),
            }))
            .await
            .unwrap();

        let err = service
            .flex_cluster(Request::new(flex_request(&[("worker", 1)])))
            .await
            .unwrap_err();
        assert_eq!(err.code(), tonic::Code::FailedPrecondition);
    }

    #[tokio::test]
    async fn protocol_negotiation() {
        let service = service();

        let ok = service
            .get_protocol_version(Request::new(proto::GetProtocolVersionRequest {
                protocol: PROTOCOL_NAME.into(),
            }))
            .await
            .unwrap();
        assert_eq!(ok.get_ref().version, PROTOCOL_VERSION);

        let err = service
            .get_protocol_version(Request::new(proto::GetProtocolVersionRequest {
                protocol: "acme.v2".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), tonic::Code::Unimplemented);
        assert!(err.message().contains(PROTOCOL_NAME));
        assert!(err.message().contains("acme.v2"));

        let err = service
            .get_protocol_version(Request::new(proto::GetProtocolVersionRequest {
                protocol: String::new(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), tonic::Code::Unimplemented);
    }
}
