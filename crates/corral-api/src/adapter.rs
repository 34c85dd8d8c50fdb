use async_trait::async_trait;
use tracing::info;

use corral_core::ClusterState;
use corral_model::{ClusterStatus, FlexDelta, NodeInfo};

use crate::{ApiError, ClusterHandler};

/// Adapter that bridges [`ClusterState`] to [`ClusterHandler`].
///
/// Ready-to-use implementation that delegates directly to the state engine.
#[derive(Clone)]
pub struct ClusterStateAdapter {
    state: ClusterState,
}

impl ClusterStateAdapter {
    pub fn new(state: ClusterState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ClusterState {
        &self.state
    }
}

#[async_trait]
impl ClusterHandler for ClusterStateAdapter {
    async fn stop_cluster(&self) -> Result<(), ApiError> {
        info!("stop requested over the control protocol");
        self.state.stop();
        Ok(())
    }

    async fn flex_cluster(&self, delta: FlexDelta) -> Result<(), ApiError> {
        self.state.apply_flex(&delta).map_err(ApiError::from)
    }

    async fn cluster_status(&self) -> Result<ClusterStatus, ApiError> {
        Ok(self.state.status())
    }

    async fn list_node_ids_by_role(&self, role: &str) -> Result<Vec<String>, ApiError> {
        self.state.list_node_ids_by_role(role).map_err(ApiError::from)
    }

    async fn get_node(&self, id: &str) -> Result<NodeInfo, ApiError> {
        self.state.get_node(id).map_err(ApiError::from)
    }

    async fn get_cluster_nodes(&self, ids: &[String]) -> Result<Vec<NodeInfo>, ApiError> {
        Ok(self.state.get_cluster_nodes(ids))
    }
}
