use std::io;

/// Supplies the serialized security-credential set attached to a launch
/// descriptor at finalization.
pub trait CredentialSource: Send + Sync {
    /// Serialize the current credential set into a token blob.
    ///
    /// I/O failure here aborts the single launch attempt, never the
    /// orchestrator process.
    fn serialized_tokens(&self) -> io::Result<Vec<u8>>;
}

/// Credential source for deployments without end-to-end security: an empty
/// token blob.
#[derive(Clone, Copy, Debug, Default)]
pub struct InsecureCredentials;

impl CredentialSource for InsecureCredentials {
    fn serialized_tokens(&self) -> io::Result<Vec<u8>> {
        Ok(Vec::new())
    }
}
