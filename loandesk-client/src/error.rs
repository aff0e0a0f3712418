use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the remote access layer.
///
/// `Transport` covers connection-level failures (DNS, refused, timeout,
/// malformed body); `Status` covers responses the server itself rejected.
/// Nothing here is retried automatically.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed, or the body could not be read/decoded.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server responded with {status}: {message}")]
    Status {
        /// HTTP status code of the response.
        status: StatusCode,
        /// Message extracted from the error body, or the raw body/status text.
        message: String,
    },
}

impl ApiError {
    /// Status code of a server-reported failure, when this is one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: "conversation not found".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("conversation not found"));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }
}
