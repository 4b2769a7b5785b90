//! Error types for the ARI client

/// Errors surfaced by the event bridge and the command client.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AriError {
    /// The event socket could not be established.
    #[error("connect failure: {0}")]
    ConnectFailure(String),

    /// A frame did not decode to a JSON object.
    #[error("malformed event: {raw}")]
    MalformedEvent {
        /// The offending frame text, verbatim.
        raw: String,
    },

    /// The underlying connection reported a fault.
    #[error("transport error: {0}")]
    Transport(String),

    /// `subscribe` was called on a bridge that already has a subscriber.
    #[error("bridge already has a subscriber")]
    AlreadySubscribed,

    /// A push-style transport delivered more frames than the backlog holds.
    #[error("event backlog exceeded {capacity} entries")]
    BacklogOverflow {
        /// Configured backlog capacity.
        capacity: usize,
    },

    /// `request(0)` was issued on a subscription.
    #[error("demand must be a positive number of events")]
    InvalidDemand,

    /// HTTP-level failure of a command request.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A command request did not complete within its timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// Asterisk answered a command with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// A base URL or command path could not be turned into a request URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// JSON encoding or decoding of a command payload failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AriError {
    pub(crate) fn connect_failure(message: impl Into<String>) -> Self {
        AriError::ConnectFailure(message.into())
    }

    pub(crate) fn transport(message: impl Into<String>) -> Self {
        AriError::Transport(message.into())
    }

    pub(crate) fn malformed(raw: impl Into<String>) -> Self {
        AriError::MalformedEvent { raw: raw.into() }
    }

    /// `true` for the errors that end an event subscription.
    pub fn is_terminal_stream_error(&self) -> bool {
        matches!(
            self,
            AriError::ConnectFailure(_)
                | AriError::MalformedEvent { .. }
                | AriError::Transport(_)
                | AriError::BacklogOverflow { .. }
                | AriError::InvalidDemand
        )
    }
}

/// Result alias used throughout the crate.
pub type AriResult<T> = Result<T, AriError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_event_carries_raw_text() {
        let err = AriError::malformed("not-json");
        assert_eq!(err.to_string(), "malformed event: not-json");
        assert!(matches!(err, AriError::MalformedEvent { ref raw } if raw == "not-json"));
    }

    #[test]
    fn stream_errors_are_classified() {
        assert!(AriError::transport("reset").is_terminal_stream_error());
        assert!(AriError::connect_failure("refused").is_terminal_stream_error());
        assert!(!AriError::AlreadySubscribed.is_terminal_stream_error());
        assert!(!AriError::Timeout { timeout_ms: 3000 }.is_terminal_stream_error());
    }
}
