use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// Rejected input: unknown role name, malformed count, malformed tuple.
    ///
    /// Always raised before any state is mutated.
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// A specification is structurally unusable, e.g. a mandatory role is
    /// missing when deriving configuration from it.
    #[error("bad configuration: {0}")]
    BadConfig(String),
}
