use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    /// Credential/token serialization failed.
    ///
    /// Fatal to the single launch attempt only; the reconciliation loop is
    /// expected to retry the role's instance creation on its next pass.
    #[error("token serialization failed: {0}")]
    TokenIo(#[from] std::io::Error),

    /// A resource override option carried an unusable value.
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// Filesystem staging of a local resource failed.
    #[error("staging failed: {0}")]
    Staging(std::io::Error),

    /// The current process user name could not be determined.
    #[error("identity propagation failed: {0}")]
    Identity(String),
}

impl From<corral_model::ModelError> for LaunchError {
    fn from(e: corral_model::ModelError) -> Self {
        LaunchError::BadArgument(e.to_string())
    }
}
