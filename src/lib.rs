//! Holded MCP Server Library
//!
//! A Model Context Protocol server that exposes the Holded invoicing API as
//! tools, on behalf of one or more Holded accounts (tenants).
//!
//! # Architecture
//!
//! - **core**: infrastructure
//!   - `client`: retrying HTTP executor and the [`ApiClient`](core::ApiClient) seam
//!   - `tenant`: tenant records and the registry that resolves them
//!   - `rate_limit`: fixed-window limiter keyed by tool name
//!   - `dispatcher`: tenant resolution, rate limiting and tool invocation for one call
//!   - `server`, `transport`, `config`, `error`
//! - **domains**
//!   - **tools**: the declarative tool catalog, one module per API family
//!
//! # Example
//!
//! ```rust,no_run
//! use holded_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = McpServer::from_config(config)?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Dispatcher, Error, McpServer, Result};
