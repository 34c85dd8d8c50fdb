use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;

use corral_model::{ClusterStatus, FlexDelta, NodeInfo};

use crate::{ApiError, ClusterHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ClusterHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - GET /api/v1/status - Cluster snapshot
    /// - POST /api/v1/flex - Apply a flex delta
    /// - POST /api/v1/stop - Begin orderly shutdown
    /// - GET /api/v1/nodes/:id - One node's detail
    /// - GET /api/v1/roles/:role/nodes - Instance ids of a role
    pub fn router(self) -> Router {
        Router::new()
            .route("/api/v1/status", get(cluster_status::<H>))
            .route("/api/v1/flex", post(flex_cluster::<H>))
            .route("/api/v1/stop", post(stop_cluster::<H>))
            .route("/api/v1/nodes/{id}", get(get_node::<H>))
            .route("/api/v1/roles/{role}/nodes", get(list_role_nodes::<H>))
            .with_state(self.handler)
    }
}

#[derive(Debug, Serialize)]
struct FlexResponse {
    accepted: bool,
}

#[derive(Debug, Serialize)]
struct RoleNodesResponse {
    ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = match &self {
            ApiError::InvalidRequest(_) | ApiError::ProtocolMismatch(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NodeNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ClusterStopping | ApiError::BadConfig(_) => StatusCode::CONFLICT,
            ApiError::ResourceManager(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (code, Json(body)).into_response()
    }
}

/// GET /api/v1/status
async fn cluster_status<H>(State(handler): State<Arc<H>>) -> Result<Json<ClusterStatus>, ApiError>
where
    H: ClusterHandler,
{
    Ok(Json(handler.cluster_status().await?))
}

/// POST /api/v1/flex
async fn flex_cluster<H>(
    State(handler): State<Arc<H>>,
    Json(delta): Json<FlexDelta>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ClusterHandler,
{
    handler.flex_cluster(delta).await?;
    Ok(Json(FlexResponse { accepted: true }))
}

/// POST /api/v1/stop
async fn stop_cluster<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ClusterHandler,
{
    handler.stop_cluster().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/nodes/:id
async fn get_node<H>(
    State(handler): State<Arc<H>>,
    Path(id): Path<String>,
) -> Result<Json<NodeInfo>, ApiError>
where
    H: ClusterHandler,
{
    Ok(Json(handler.get_node(&id).await?))
}

/// GET /api/v1/roles/:role/nodes
async fn list_role_nodes<H>(
    State(handler): State<Arc<H>>,
    Path(role): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ClusterHandler,
{
    let ids = handler.list_node_ids_by_role(&role).await?;
    Ok(Json(RoleNodesResponse { ids }))
}
