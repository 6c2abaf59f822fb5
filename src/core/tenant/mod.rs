//! Multi-tenant support.
//!
//! Each tenant is an isolated Holded account: its own API key, its own
//! enable flag, and its own [`RequestExecutor`](crate::core::client::RequestExecutor).
//! The registry is populated once at startup and only read afterwards.

mod config;
mod error;
mod registry;

pub use config::{TENANT_ID_ARGUMENT, TenantConfig, extract_tenant_id};
pub use error::{TenantError, TenantResult};
pub use registry::{TenantContext, TenantRegistry};
