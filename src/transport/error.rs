use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    /// Upstream rejected the request with a status that is not worth retrying.
    #[error("upstream returned HTTP {status}")]
    Http { status: StatusCode },

    #[error("upstream still failing after {attempts} attempts: {last}")]
    RetryExhausted { attempts: u32, last: String },

    #[error("circuit breaker is open, upstream calls are suspended")]
    CircuitOpen,

    #[error("failed to decode upstream response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("upstream request timed out")]
    Timeout,

    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),

    /// The caller went away before the call completed. Not a failure.
    #[error("upstream request cancelled")]
    Cancelled,
}

impl TransportError {
    /// Transport-level failures that a later attempt may not hit.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// 5xx and 429 are worth another attempt; every other status is final.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
