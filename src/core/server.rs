//! MCP Server implementation and lifecycle management.
//!
//! The server advertises the tool catalog and hands every call to the
//! [`Dispatcher`]. Tools are declared in `domains/tools/definitions/`; adding
//! one does not require touching this file.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use super::client::RequestExecutor;
use super::config::Config;
use super::dispatcher::{DispatchError, Dispatcher};
use super::error::{Error, Result};
use super::rate_limit::RateLimiter;
use super::tenant::{TenantError, TenantRegistry};
use crate::domains::tools::ToolRegistry;

const INSTRUCTIONS: &str = "Tools for the Holded invoicing API: documents, contacts, \
products, services, payments, treasuries, taxes and more. Every tool accepts an optional \
`tenantId` argument selecting the Holded account to use; without it the default account \
is used.";

/// The main MCP server handler.
///
/// Cheap to clone: the TCP transport hands one clone to each connection.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    dispatcher: Dispatcher,
}

impl McpServer {
    /// Create a server around an already assembled dispatcher.
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher,
        }
    }

    /// Build tenants, rate limiter and tool catalog from `config`.
    ///
    /// Fails when the tenant list is invalid or when there is no enabled
    /// default tenant to fall back on.
    pub fn from_config(config: Config) -> Result<Self> {
        let http = RequestExecutor::http_client(config.api.request_timeout())?;
        let prototype = RequestExecutor::new(
            http,
            config.api.base_url.clone(),
            "",
            Arc::new(config.retry.clone()),
        );

        let tenants = TenantRegistry::from_configs(prototype, config.tenants.clone())?;
        match tenants.default_tenant() {
            Some(tenant) if tenant.is_enabled() => {
                info!(
                    tenant = %tenant.tenant_id,
                    tenants = tenants.len(),
                    "Default tenant: {}",
                    tenant.display_name()
                );
            }
            Some(tenant) => {
                return Err(Error::config(format!(
                    "default tenant '{}' is disabled",
                    tenant.tenant_id
                )));
            }
            None => return Err(TenantError::NoDefault.into()),
        }

        let limiter = RateLimiter::new(config.rate_limit.clone());
        let tools = ToolRegistry::new();
        info!("{} tools registered", tools.len());

        let dispatcher = Dispatcher::new(Arc::new(tenants), Arc::new(limiter), Arc::new(tools));
        Ok(Self::new(config, dispatcher))
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools as JSON (for HTTP transport).
    pub fn list_tools(&self) -> Vec<Value> {
        self.dispatcher
            .tools()
            .list_tools()
            .into_iter()
            .filter_map(|tool| serde_json::to_value(tool).ok())
            .collect()
    }

    /// Call a tool by name and return the serialized result (for HTTP transport).
    ///
    /// Only an unknown tool or malformed arguments produce `Err`; every other
    /// failure is reported inside the result with `isError: true`.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> std::result::Result<Value, String> {
        let arguments = match arguments {
            Value::Object(map) => Some(map),
            Value::Null => None,
            _ => return Err("Tool arguments must be a JSON object".to_string()),
        };

        let result = self
            .dispatcher
            .dispatch(name, arguments)
            .await
            .map_err(|e| e.to_string())?;
        serde_json::to_value(result).map_err(|e| e.to_string())
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.dispatcher.tools().list_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.dispatcher
            .dispatch(&request.name, request.arguments)
            .await
            .map_err(|e| match e {
                DispatchError::UnknownOperation(_) => McpError::invalid_params(e.to_string(), None),
            })
    }
}
