//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server:
//! the remote API client, tenants, rate limiting, dispatch, configuration,
//! the MCP server itself and the transport layer.

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod rate_limit;
pub mod server;
pub mod tenant;
pub mod transport;

pub use client::{ApiClient, ExecutionError, RequestExecutor, RetryPolicy};
pub use config::Config;
pub use dispatcher::{DispatchError, Dispatcher};
pub use error::{Error, Result};
pub use rate_limit::{RateLimitConfig, RateLimitDecision, RateLimitRule, RateLimiter};
pub use server::McpServer;
pub use tenant::{TenantConfig, TenantContext, TenantError, TenantRegistry};
pub use transport::{TransportConfig, TransportService};
