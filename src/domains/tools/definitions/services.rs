//! Services sold to clients.

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::common::{WindowArgs, body_of, project_list, segment};
use crate::core::client::{ApiClient, QueryParams};
use crate::domains::tools::{ToolDefinition, ToolKind, ToolResult};

const LIST_FIELDS: &[&str] = &["id", "name", "price", "tax"];

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NewService {
    #[schemars(description = "Service name")]
    pub name: String,

    #[schemars(description = "Service description")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[schemars(description = "Service SKU")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    #[schemars(description = "Service price")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[schemars(description = "Tax percentage")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ServiceChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRef {
    #[schemars(description = "Service ID")]
    pub service_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceParams {
    #[schemars(description = "Service ID to update")]
    pub service_id: String,

    #[serde(flatten)]
    pub changes: ServiceChanges,
}

fn service_path(service_id: &str) -> ToolResult<String> {
    Ok(format!("/services/{}", segment(service_id, "serviceId")?))
}

async fn list_services(client: Arc<dyn ApiClient>, params: WindowArgs) -> ToolResult<Value> {
    let mut query = QueryParams::new();
    params.push_query(&mut query);
    let response = client.get("/services", Some(query)).await?;
    Ok(params.apply(project_list(response, LIST_FIELDS)?))
}

async fn create_service(client: Arc<dyn ApiClient>, params: NewService) -> ToolResult<Value> {
    Ok(client.post("/services", Some(body_of(&params)?)).await?)
}

async fn get_service(client: Arc<dyn ApiClient>, params: ServiceRef) -> ToolResult<Value> {
    Ok(client.get(&service_path(&params.service_id)?, None).await?)
}

async fn update_service(client: Arc<dyn ApiClient>, params: UpdateServiceParams) -> ToolResult<Value> {
    let path = service_path(&params.service_id)?;
    Ok(client.put(&path, Some(body_of(&params.changes)?)).await?)
}

async fn delete_service(client: Arc<dyn ApiClient>, params: ServiceRef) -> ToolResult<Value> {
    Ok(client.delete(&service_path(&params.service_id)?).await?)
}

pub fn tools() -> Vec<ToolDefinition> {
    use ToolKind::{Destructive, ReadOnly};

    vec![
        ToolDefinition::new("list_services", "List all services", ReadOnly, list_services),
        ToolDefinition::new("create_service", "Create a new service", Destructive, create_service),
        ToolDefinition::new("get_service", "Get a specific service by ID", ReadOnly, get_service),
        ToolDefinition::new("update_service", "Update an existing service", Destructive, update_service),
        ToolDefinition::new("delete_service", "Delete a service", Destructive, delete_service),
    ]
}
