//! Declarative tool definitions.
//!
//! A [`ToolDefinition`] pairs the MCP metadata of a tool with a type-erased
//! handler. Handlers are plain async functions taking the tenant's
//! [`ApiClient`] and a typed params struct; the JSON input schema is derived
//! from that struct.

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{JsonObject, Tool, ToolAnnotations};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;

use super::{ToolError, ToolResult};
use crate::core::client::ApiClient;
use crate::core::tenant::TENANT_ID_ARGUMENT;

type ErasedHandler =
    Arc<dyn Fn(Arc<dyn ApiClient>, JsonObject) -> BoxFuture<'static, ToolResult<Value>> + Send + Sync>;

/// Effect of a tool on the remote account, advertised as an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    ReadOnly,
    Destructive,
}

/// One named operation exposed to MCP clients.
#[derive(Clone)]
pub struct ToolDefinition {
    tool: Tool,
    kind: ToolKind,
    handler: ErasedHandler,
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.tool.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl ToolDefinition {
    /// Define a tool whose arguments deserialize into `P`.
    pub fn new<P, F, Fut>(
        name: &'static str,
        description: &'static str,
        kind: ToolKind,
        handler: F,
    ) -> Self
    where
        P: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(Arc<dyn ApiClient>, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult<Value>> + Send + 'static,
    {
        let handler: ErasedHandler = Arc::new(move |client, arguments| {
            match serde_json::from_value::<P>(Value::Object(arguments)) {
                Ok(params) => handler(client, params).boxed(),
                Err(e) => futures::future::ready(Err(ToolError::invalid_arguments(e.to_string())))
                    .boxed(),
            }
        });

        let annotations = ToolAnnotations {
            title: None,
            read_only_hint: Some(kind == ToolKind::ReadOnly),
            destructive_hint: Some(kind == ToolKind::Destructive),
            idempotent_hint: None,
            open_world_hint: Some(true),
        };

        Self {
            tool: Tool {
                name: name.into(),
                description: Some(description.into()),
                input_schema: Arc::new(input_schema::<P>()),
                annotations: Some(annotations),
                output_schema: None,
                icons: None,
                meta: None,
                title: None,
            },
            kind,
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.tool.name
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    /// MCP metadata for `tools/list`.
    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Run the handler with raw call arguments.
    pub async fn call(&self, client: Arc<dyn ApiClient>, arguments: JsonObject) -> ToolResult<Value> {
        (self.handler)(client, arguments).await
    }
}

/// Schema of `P`, advertising the optional tenant selector as well.
fn input_schema<P: JsonSchema + 'static>() -> JsonObject {
    let mut schema = (*cached_schema_for_type::<P>()).clone();
    schema.insert("type".to_string(), json!("object"));

    let properties = schema
        .entry("properties")
        .or_insert_with(|| json!({}));
    if let Some(properties) = properties.as_object_mut() {
        properties.insert(
            TENANT_ID_ARGUMENT.to_string(),
            json!({
                "type": "string",
                "description": "Tenant to run the call for (optional, defaults to the default tenant)"
            }),
        );
    }
    schema
}
