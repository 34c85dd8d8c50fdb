use async_trait::async_trait;

use corral_model::{ClusterStatus, FlexDelta, NodeInfo};

use crate::ApiError;

/// Cluster control API handler.
///
/// Abstracts the backend so the transport shells (gRPC, HTTP) stay thin:
/// use the provided [`crate::ClusterStateAdapter`], or wrap it with custom
/// logic (auth, auditing) behind the same trait. Every method must be safe
/// to call concurrently; reads operate on consistent snapshots.
#[async_trait]
pub trait ClusterHandler: Send + Sync + 'static {
    /// Initiate orderly shutdown. Idempotent while already stopping.
    async fn stop_cluster(&self) -> Result<(), ApiError>;

    /// Validate and apply a flex delta. Acceptance only: the response does
    /// not wait for reconciliation.
    async fn flex_cluster(&self, delta: FlexDelta) -> Result<(), ApiError>;

    /// Point-in-time snapshot of the whole cluster.
    async fn cluster_status(&self) -> Result<ClusterStatus, ApiError>;

    /// Identifiers of the instances currently assigned to a role; an
    /// unrecognized role is an error, an idle role is an empty list.
    async fn list_node_ids_by_role(&self, role: &str) -> Result<Vec<String>, ApiError>;

    /// Detail for one tracked instance.
    async fn get_node(&self, id: &str) -> Result<NodeInfo, ApiError>;

    /// Details for the requested identifiers; unknown ids are omitted.
    async fn get_cluster_nodes(&self, ids: &[String]) -> Result<Vec<NodeInfo>, ApiError>;
}
