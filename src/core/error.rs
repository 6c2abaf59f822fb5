//! Error types and handling for the MCP server.
//!
//! Each layer has its own error enum; this module gathers them into a single
//! type for startup and other code paths that cross layers.

use thiserror::Error;

use super::client::ExecutionError;
use super::dispatcher::DispatchError;
use super::tenant::TenantError;
use super::transport::TransportError;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    #[error("Tenant error: {0}")]
    Tenant(#[from] TenantError),

    /// A remote API call that failed after all retries.
    #[error("Request error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_errors_convert() {
        let err: Error = TenantError::NotFound("acme".to_string()).into();
        assert!(matches!(err, Error::Tenant(_)));
        assert_eq!(err.to_string(), "Tenant error: Tenant 'acme' not found");

        let err: Error = DispatchError::UnknownOperation("nope".to_string()).into();
        assert_eq!(err.to_string(), "Dispatch error: Unknown tool: nope");
    }
}
