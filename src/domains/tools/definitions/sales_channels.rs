//! Sales channels.

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
pub struct NewSalesChannel {
    #[schemars(description = "Sales channel name")]
    pub name: String,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SalesChannelChanges {
    #[schemars(description = "Sales channel name")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesChannelRef {
    #[schemars(description = "Sales channel ID")]
    pub channel_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalesChannelParams {
    #[schemars(description = "Sales channel ID to update")]
    pub channel_id: String,

    #[serde(flatten)]
    pub changes: SalesChannelChanges,
}

fn channel_path(channel_id: &str) -> ToolResult<String> {
    Ok(format!("/saleschannels/{}", segment(channel_id, "channelId")?))
}

async fn list_sales_channels(client: Arc<dyn ApiClient>, params: PageArgs) -> ToolResult<Value> {
    let response = client.get("/saleschannels", None).await?;
    Ok(params.apply(project_list(response, LIST_FIELDS)?))
}

async fn create_sales_channel(client: Arc<dyn ApiClient>, params: NewSalesChannel) -> ToolResult<Value> {
    Ok(client.post("/saleschannels", Some(body_of(&params)?)).await?)
}

async fn get_sales_channel(client: Arc<dyn ApiClient>, params: SalesChannelRef) -> ToolResult<Value> {
    Ok(client.get(&channel_path(&params.channel_id)?, None).await?)
}

async fn update_sales_channel(
    client: Arc<dyn ApiClient>,
    params: UpdateSalesChannelParams,
) -> ToolResult<Value> {
    let path = channel_path(&params.channel_id)?;
    Ok(client.put(&path, Some(body_of(&params.changes)?)).await?)
}

async fn delete_sales_channel(client: Arc<dyn ApiClient>, params: SalesChannelRef) -> ToolResult<Value> {
    Ok(client.delete(&channel_path(&params.channel_id)?).await?)
}

pub fn tools() -> Vec<ToolDefinition> {
    use ToolKind::{Destructive, ReadOnly};

    vec![
        ToolDefinition::new(
            "list_sales_channels",
            "List all sales channels with pagination support",
            ReadOnly,
            list_sales_channels,
        ),
        ToolDefinition::new(
            "create_sales_channel",
            "Create a new sales channel",
            Destructive,
            create_sales_channel,
        ),
        ToolDefinition::new(
            "get_sales_channel",
            "Get a specific sales channel by ID",
            ReadOnly,
            get_sales_channel,
        ),
        ToolDefinition::new(
            "update_sales_channel",
            "Update an existing sales channel",
            Destructive,
            update_sales_channel,
        ),
        ToolDefinition::new(
            "delete_sales_channel",
            "Delete a sales channel",
            Destructive,
            delete_sales_channel,
        ),
    ]
}
