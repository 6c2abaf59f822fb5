//! Contact groups.

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::common::{PageArgs, body_of, project_list, segment};
use crate::core::client::ApiClient;
use crate::domains::tools::{ToolDefinition, ToolKind, ToolResult};

const LIST_FIELDS: &[&str] = &["id", "name"];

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NewContactGroup {
    #[schemars(description = "Contact group name")]
    pub name: String,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactGroupRef {
    #[schemars(description = "Contact group ID")]
    pub group_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactGroupParams {
    #[schemars(description = "Contact group ID to update")]
    pub group_id: String,

    #[schemars(description = "Contact group name")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

fn group_path(group_id: &str) -> ToolResult<String> {
    Ok(format!("/contactgroups/{}", segment(group_id, "groupId")?))
}

async fn list_contact_groups(client: Arc<dyn ApiClient>, params: PageArgs) -> ToolResult<Value> {
    let response = client.get("/contactgroups", None).await?;
    Ok(params.apply(project_list(response, LIST_FIELDS)?))
}

async fn create_contact_group(client: Arc<dyn ApiClient>, params: NewContactGroup) -> ToolResult<Value> {
    Ok(client.post("/contactgroups", Some(body_of(&params)?)).await?)
}

async fn get_contact_group(client: Arc<dyn ApiClient>, params: ContactGroupRef) -> ToolResult<Value> {
    Ok(client.get(&group_path(&params.group_id)?, None).await?)
}

async fn update_contact_group(
    client: Arc<dyn ApiClient>,
    params: UpdateContactGroupParams,
) -> ToolResult<Value> {
    let path = group_path(&params.group_id)?;
    let mut body = params.extra;
    if let Some(name) = params.name {
        body.insert("name".into(), Value::String(name));
    }
    Ok(client.put(&path, Some(Value::Object(body))).await?)
}

async fn delete_contact_group(client: Arc<dyn ApiClient>, params: ContactGroupRef) -> ToolResult<Value> {
    Ok(client.delete(&group_path(&params.group_id)?).await?)
}

pub fn tools() -> Vec<ToolDefinition> {
    use ToolKind::{Destructive, ReadOnly};

    vec![
        ToolDefinition::new(
            "list_contact_groups",
            "List all contact groups with pagination support",
            ReadOnly,
            list_contact_groups,
        ),
        ToolDefinition::new(
            "create_contact_group",
            "Create a new contact group",
            Destructive,
            create_contact_group,
        ),
        ToolDefinition::new(
            "get_contact_group",
            "Get a specific contact group by ID",
            ReadOnly,
            get_contact_group,
        ),
        ToolDefinition::new(
            "update_contact_group",
            "Update an existing contact group",
            Destructive,
            update_contact_group,
        ),
        ToolDefinition::new(
            "delete_contact_group",
            "Delete a contact group",
            Destructive,
            delete_contact_group,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::{Call, MockApiClient, run};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_contact_groups() {
        let tools = tools();
        let client = Arc::new(MockApiClient::new().with_get_response(json!([
            {"id": "g1", "name": "VIP", "color": "red"},
            {"id": "g2", "name": "Wholesale"}
        ])));
        let out = run(&tools, &client, "list_contact_groups", json!({"pageSize": 1}))
            .await
            .unwrap();
        assert_eq!(out["items"], json!([{"id": "g1", "name": "VIP"}]));
        assert_eq!(out["totalPages"], 2);
    }

    #[tokio::test]
    async fn test_contact_group_crud_paths() {
        let tools = tools();
        let client = Arc::new(MockApiClient::new());
        run(&tools, &client, "create_contact_group", json!({"name": "VIP"})).await.unwrap();
        run(&tools, &client, "get_contact_group", json!({"groupId": "g1"})).await.unwrap();
        run(
            &tools,
            &client,
            "update_contact_group",
            json!({"groupId": "g1", "name": "Gold"}),
        )
        .await
        .unwrap();
        run(&tools, &client, "delete_contact_group", json!({"groupId": "g1"}))
            .await
            .unwrap();

        assert_eq!(
            client.calls(),
            vec![
                Call::Post { path: "/contactgroups".into(), body: Some(json!({"name": "VIP"})) },
                Call::Get { path: "/contactgroups/g1".into(), query: None },
                Call::Put { path: "/contactgroups/g1".into(), body: Some(json!({"name": "Gold"})) },
                Call::Delete { path: "/contactgroups/g1".into() },
            ]
        );
    }
}
