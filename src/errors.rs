use thiserror::Error;

/// Everything that can go wrong during a hiscores lookup. All variants are
/// converted to a user-visible message at the fetch boundary; none of them
/// propagate past it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The endpoint answered with a non-200 status. Only the numeric code
    /// is surfaced; the body is ignored.
    #[error("Failed to load details, API returned: {0}")]
    Status(u16),
    /// The body arrived but did not decode as a stats payload.
    #[error("Invalid response from the stats API: {0}")]
    InvalidResponse(String),
    /// The request never produced a response at all.
    #[error("Lookup failed: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_contains_the_numeric_code() {
        assert_eq!(
            LookupError::Status(404).to_string(),
            "Failed to load details, API returned: 404"
        );
        assert!(LookupError::Status(502).to_string().contains("502"));
    }

    #[test]
    fn non_status_failures_keep_their_cause_in_the_message() {
        assert_eq!(
            LookupError::Transport("connection refused".to_string()).to_string(),
            "Lookup failed: connection refused"
        );
        assert_eq!(
            LookupError::InvalidResponse("missing field `skills`".to_string()).to_string(),
            "Invalid response from the stats API: missing field `skills`"
        );
    }
}
