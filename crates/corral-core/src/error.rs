use thiserror::Error;

use corral_model::ModelError;

use crate::ProviderError;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Rejected request input; nothing was mutated.
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// A derived-configuration build step cannot proceed.
    #[error("bad configuration: {0}")]
    BadConfig(String),

    /// The identifier does not correspond to any tracked instance.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// Mutating calls are rejected once shutdown has begun.
    #[error("cluster is stopping")]
    ClusterStopping,

    /// A call to the underlying resource manager failed. The classification
    /// is preserved when this crosses the protocol boundary.
    #[error("resource manager failure: {0}")]
    ResourceManager(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Launch(#[from] corral_launch::LaunchError),
}

impl From<ModelError> for CoreError {
    fn from(e: ModelError) -> Self {
        // Keep the original classification rather than nesting it.
        match e {
            ModelError::BadArgument(msg) => CoreError::BadArgument(msg),
            ModelError::BadConfig(msg) => CoreError::BadConfig(msg),
        }
    }
}
