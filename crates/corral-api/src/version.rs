use crate::ApiError;

/// Protocol name implemented by this server.
pub const PROTOCOL_NAME: &str = "corral.cluster.v1";

/// Fixed protocol version identifier returned by negotiation.
pub const PROTOCOL_VERSION: u32 = 1;

/// Reject a client-declared protocol name the server does not implement.
///
/// Matching is exact; an empty name is a mismatch like any other, so a
/// client that fails to declare itself cannot slip through negotiation.
/// The error names both the implemented and the requested protocol.
pub fn check_protocol(requested: &str) -> Result<(), ApiError> {
    if requested == PROTOCOL_NAME {
        return Ok(());
    }
    Err(ApiError::ProtocolMismatch(format!(
        "server implements {PROTOCOL_NAME}; requested protocol {requested:?} is not supported"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implemented_name_passes() {
        assert!(check_protocol(PROTOCOL_NAME).is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = check_protocol("").unwrap_err();
        assert!(matches!(err, ApiError::ProtocolMismatch(_)));
    }

    #[test]
    fn mismatch_names_both_protocols() {
        let err = check_protocol("acme.cluster.v9").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(PROTOCOL_NAME));
        assert!(msg.contains("acme.cluster.v9"));
        assert!(matches!(err, ApiError::ProtocolMismatch(_)));
    }
}
