//! Tool-specific error types.

use thiserror::Error;

use crate::core::client::ExecutionError;

/// Result type for tool handlers.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur while running a tool handler.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The remote API call failed after retries.
    #[error(transparent)]
    Api(#[from] ExecutionError),

    /// The API answered with something the tool cannot use.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ToolError {
    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "unexpected response" error.
    pub fn unexpected_response(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }
}
