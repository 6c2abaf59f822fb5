//! Warehouses.

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::common::{NoParams, body_of, segment};
use crate::core::client::ApiClient;
use crate::domains::tools::{ToolDefinition, ToolKind, ToolResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseFields {
    #[schemars(description = "Warehouse address")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NewWarehouse {
    #[schemars(description = "Warehouse name")]
    pub name: String,

    #[serde(flatten)]
    pub fields: WarehouseFields,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseRef {
    #[schemars(description = "Warehouse ID")]
    pub warehouse_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWarehouseParams {
    #[schemars(description = "Warehouse ID to update")]
    #[serde(skip_serializing)]
    pub warehouse_id: String,

    #[schemars(description = "Warehouse name")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub fields: WarehouseFields,
}

fn warehouse_path(warehouse_id: &str) -> ToolResult<String> {
    Ok(format!("/warehouses/{}", segment(warehouse_id, "warehouseId")?))
}

async fn list_warehouses(client: Arc<dyn ApiClient>, _params: NoParams) -> ToolResult<Value> {
    Ok(client.get("/warehouses", None).await?)
}

async fn create_warehouse(client: Arc<dyn ApiClient>, params: NewWarehouse) -> ToolResult<Value> {
    Ok(client.post("/warehouses", Some(body_of(&params)?)).await?)
}

async fn get_warehouse(client: Arc<dyn ApiClient>, params: WarehouseRef) -> ToolResult<Value> {
    Ok(client.get(&warehouse_path(&params.warehouse_id)?, None).await?)
}

async fn update_warehouse(client: Arc<dyn ApiClient>, params: UpdateWarehouseParams) -> ToolResult<Value> {
    let path = warehouse_path(&params.warehouse_id)?;
    Ok(client.put(&path, Some(body_of(&params)?)).await?)
}

async fn delete_warehouse(client: Arc<dyn ApiClient>, params: WarehouseRef) -> ToolResult<Value> {
    Ok(client.delete(&warehouse_path(&params.warehouse_id)?).await?)
}

pub fn tools() -> Vec<ToolDefinition> {
    use ToolKind::{Destructive, ReadOnly};

    vec![
        ToolDefinition::new("list_warehouses", "List all warehouses", ReadOnly, list_warehouses),
        ToolDefinition::new("create_warehouse", "Create a new warehouse", Destructive, create_warehouse),
        ToolDefinition::new("get_warehouse", "Get a specific warehouse by ID", ReadOnly, get_warehouse),
        ToolDefinition::new(
            "update_warehouse",
            "Update an existing warehouse",
            Destructive,
            update_warehouse,
        ),
        ToolDefinition::new("delete_warehouse", "Delete a warehouse", Destructive, delete_warehouse),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::{Call, MockApiClient, run};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_warehouses_passes_through() {
        let tools = tools();
        let client = Arc::new(MockApiClient::new().with_get_response(json!([{"id": "w1"}])));
        let out = run(&tools, &client, "list_warehouses", json!({})).await.unwrap();
        assert_eq!(out, json!([{"id": "w1"}]));
    }

    #[tokio::test]
    async fn test_warehouse_crud_paths() {
        let tools = tools();
        let client = Arc::new(MockApiClient::new());
        run(
            &tools,
            &client,
            "create_warehouse",
            json!({"name": "Main", "city": "Valencia", "postalCode": "46001"}),
        )
        .await
        .unwrap();
        run(&tools, &client, "get_warehouse", json!({"warehouseId": "w1"})).await.unwrap();
        run(
            &tools,
            &client,
            "update_warehouse",
            json!({"warehouseId": "w1", "name": "Central"}),
        )
        .await
        .unwrap();
        run(&tools, &client, "delete_warehouse", json!({"warehouseId": "w1"}))
            .await
            .unwrap();

        assert_eq!(
            client.calls(),
            vec![
                Call::Post {
                    path: "/warehouses".into(),
                    body: Some(json!({"name": "Main", "city": "Valencia", "postalCode": "46001"})),
                },
                Call::Get { path: "/warehouses/w1".into(), query: None },
                Call::Put {
                    path: "/warehouses/w1".into(),
                    body: Some(json!({"name": "Central"})),
                },
                Call::Delete { path: "/warehouses/w1".into() },
            ]
        );
    }
}
