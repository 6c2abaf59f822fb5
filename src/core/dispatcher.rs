//! Call dispatcher: the single entry point for one tool call.
//!
//! Order of checks for every call:
//!
//! 1. take the optional `tenantId` out of the arguments
//! 2. resolve the tenant (unknown → error envelope)
//! 3. reject disabled tenants (error envelope)
//! 4. look the tool up (unknown → [`DispatchError::UnknownOperation`])
//! 5. consult the rate limiter (rejected → error envelope with retry guidance)
//! 6. run the handler with the tenant's client
//!
//! Everything except an unknown tool ends as a [`CallToolResult`]; handler
//! failures never reach the transport.

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::client::ApiClient;
use super::rate_limit::{RateLimitDecision, RateLimiter};
use super::tenant::{TenantRegistry, extract_tenant_id};
use crate::domains::tools::ToolRegistry;

/// Failures that escape dispatch instead of becoming a tool result.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownOperation(String),
}

/// Ties tenants, rate limits and tools together.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tenants: Arc<TenantRegistry>,
    limiter: Arc<RateLimiter>,
    tools: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(
        tenants: Arc<TenantRegistry>,
        limiter: Arc<RateLimiter>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            tenants,
            limiter,
            tools,
        }
    }

    pub fn tenants(&self) -> &TenantRegistry {
        &self.tenants
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run the tool `name` with the raw call arguments.
    #[instrument(skip(self, arguments), fields(tool = %name))]
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, DispatchError> {
        let mut arguments = arguments.unwrap_or_default();
        let requested = extract_tenant_id(&mut arguments);

        let tenant = match self.tenants.resolve(requested.as_deref()) {
            Ok(tenant) => tenant,
            Err(e) => {
                warn!("Tenant resolution failed: {}", e);
                return Ok(error_envelope(json!({ "error": e.to_string() })));
            }
        };

        if !self.tenants.is_enabled(&tenant) {
            warn!(tenant = %tenant.tenant_id, "Call rejected for disabled tenant");
            return Ok(error_envelope(json!({
                "error": "Tenant disabled",
                "message": format!("Tenant '{}' is currently disabled", tenant.tenant_id),
            })));
        }

        let tool = self.tools.get(name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", name);
            DispatchError::UnknownOperation(name.to_string())
        })?;

        let decision = self.limiter.check_limit(name);
        if !decision.allowed {
            return Ok(rate_limited(name, &decision));
        }

        info!(tenant = %tenant.tenant_id, "Calling tool");
        let client: Arc<dyn ApiClient> = tenant.executor.clone();
        match tool.call(client, arguments).await {
            Ok(value) => {
                debug!("Tool call succeeded");
                Ok(CallToolResult::success(vec![Content::text(
                    value.to_string(),
                )]))
            }
            Err(e) => {
                warn!(tenant = %tenant.tenant_id, "Tool call failed: {}", e);
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Error: {e}"
                ))]))
            }
        }
    }
}

fn error_envelope(body: Value) -> CallToolResult {
    CallToolResult::error(vec![Content::text(body.to_string())])
}

fn rate_limited(name: &str, decision: &RateLimitDecision) -> CallToolResult {
    let retry_after = decision.retry_after_secs.unwrap_or(0);
    error_envelope(json!({
        "error": "Rate limit exceeded",
        "message": format!(
            "Too many requests for tool '{name}'. Please retry after {retry_after} seconds."
        ),
        "retryAfter": retry_after,
        "resetTime": decision.reset_at.timestamp_millis(),
    }))
}
