//! Errors surfaced by the request executor.

use thiserror::Error;

/// Result type for remote API calls.
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Terminal failure of a remote API call.
///
/// Only the final outcome is ever returned to callers: retryable variants
/// reach them once the retry budget is spent.
#[derive(Debug, Clone, Error)]
pub enum ExecutionError {
    /// The transport failed (DNS, connection refused, timeout, truncated body).
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a status listed as retryable by the policy.
    #[error("Holded API error ({status}): {body}")]
    RetryableStatus { status: u16, body: String },

    /// The API answered with any other non-success status.
    #[error("Holded API error ({status}): {body}")]
    Status { status: u16, body: String },

    /// A non-empty success body was not valid JSON.
    #[error("Failed to parse Holded API response: {0}")]
    Parse(String),

    /// Every attempt failed without recording an error.
    #[error("Request failed after {attempts} attempt(s)")]
    Exhausted { attempts: u32 },
}

impl ExecutionError {
    /// Create a network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::RetryableStatus { .. })
    }

    /// HTTP status carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RetryableStatus { status, .. } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ExecutionError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        Self::Network(format!("{kind}: {err}"))
    }
}
