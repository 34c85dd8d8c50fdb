use thiserror::Error;

use corral_core::CoreError;

/// Protocol-level error type.
///
/// Kinds mirror the classifications a client is expected to act on; the
/// transport mapping preserves them (see the `grpc` feature) so a remote
/// failure is never downgraded to a generic one.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("cluster is stopping")]
    ClusterStopping,

    #[error("bad configuration: {0}")]
    BadConfig(String),

    #[error("resource manager failure: {0}")]
    ResourceManager(String),

    #[error("protocol mismatch: {0}")]
    ProtocolMismatch(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BadArgument(msg) => ApiError::InvalidRequest(msg),
            CoreError::UnknownNode(id) => ApiError::NodeNotFound(id),
            CoreError::ClusterStopping => ApiError::ClusterStopping,
            CoreError::BadConfig(msg) => ApiError::BadConfig(msg),
            CoreError::ResourceManager(msg) => ApiError::ResourceManager(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<corral_model::ModelError> for ApiError {
    fn from(err: corral_model::ModelError) -> Self {
        match err {
            corral_model::ModelError::BadArgument(msg) => ApiError::InvalidRequest(msg),
            corral_model::ModelError::BadConfig(msg) => ApiError::BadConfig(msg),
        }
    }
}

#[cfg(feature = "grpc")]
mod grpc {
    use super::ApiError;
    use tonic::Status;

    /// Metadata key carrying the error classification across the wire.
    pub const ERROR_KIND_KEY: &str = "x-corral-error-kind";

    impl ApiError {
        fn kind(&self) -> &'static str {
            match self {
                ApiError::InvalidRequest(_) => "invalid-request",
                ApiError::NodeNotFound(_) => "node-not-found",
                ApiError::ClusterStopping => "cluster-stopping",
                ApiError::BadConfig(_) => "bad-config",
                ApiError::ResourceManager(_) => "resource-manager",
                ApiError::ProtocolMismatch(_) => "protocol-mismatch",
                ApiError::Internal(_) => "internal",
            }
        }

        fn from_kind(kind: &str, message: String) -> Option<ApiError> {
            Some(match kind {
                "invalid-request" => ApiError::InvalidRequest(message),
                "node-not-found" => ApiError::NodeNotFound(message),
                "cluster-stopping" => ApiError::ClusterStopping,
                "bad-config" => ApiError::BadConfig(message),
                "resource-manager" => ApiError::ResourceManager(message),
                "protocol-mismatch" => ApiError::ProtocolMismatch(message),
                "internal" => ApiError::Internal(message),
                _ => return None,
            })
        }

        /// Unwrap a transport-level error back into the original typed
        /// error, keeping its classification and message.
        ///
        /// The classification tag in the status metadata wins; statuses
        /// produced by other servers fall back to a gRPC-code mapping.
        pub fn from_status(status: Status) -> ApiError {
            let message = status.message().to_string();
            if let Some(kind) = status.metadata().get(ERROR_KIND_KEY)
                && let Ok(kind) = kind.to_str()
                && let Some(err) = ApiError::from_kind(kind, message.clone())
            {
                return err;
            }
            match status.code() {
                tonic::Code::InvalidArgument => ApiError::InvalidRequest(message),
                tonic::Code::NotFound => ApiError::NodeNotFound(message),
                tonic::Code::Unavailable => ApiError::ResourceManager(message),
                tonic::Code::Unimplemented => ApiError::ProtocolMismatch(message),
                _ => ApiError::Internal(message),
            }
        }
    }

    impl From<ApiError> for Status {
        fn from(err: ApiError) -> Self {
            let kind = err.kind();
            let mut status = match &err {
                ApiError::InvalidRequest(msg) => Status::invalid_argument(msg.clone()),
                ApiError::NodeNotFound(id) => Status::not_found(id.clone()),
                ApiError::ClusterStopping => Status::failed_precondition(err.to_string()),
                ApiError::BadConfig(msg) => Status::failed_precondition(msg.clone()),
                ApiError::ResourceManager(msg) => Status::unavailable(msg.clone()),
                ApiError::ProtocolMismatch(msg) => Status::unimplemented(msg.clone()),
                ApiError::Internal(msg) => Status::internal(msg.clone()),
            };
            if let Ok(value) = kind.parse() {
                status.metadata_mut().insert(ERROR_KIND_KEY, value);
            }
            status
        }
    }

}

#[cfg(feature = "grpc")]
pub use grpc::ERROR_KIND_KEY;
