//! Treasury (bank and cash) accounts.

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::common::{PageArgs, body_of, project_list, segment};
use crate::core::client::ApiClient;
use crate::domains::tools::{ToolDefinition, ToolKind, ToolResult};

const LIST_FIELDS: &[&str] = &["id", "name", "balance"];

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NewTreasury {
    #[schemars(description = "Treasury account name")]
    pub name: String,

    #[schemars(description = "IBAN number")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,

    #[schemars(description = "BIC/SWIFT code")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,

    #[schemars(description = "Initial balance")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryRef {
    #[schemars(description = "Treasury account ID")]
    pub treasury_id: String,
}

async fn list_treasuries(client: Arc<dyn ApiClient>, params: PageArgs) -> ToolResult<Value> {
    let response = client.get("/treasury", None).await?;
    Ok(params.apply(project_list(response, LIST_FIELDS)?))
}

async fn create_treasury(client: Arc<dyn ApiClient>, params: NewTreasury) -> ToolResult<Value> {
    Ok(client.post("/treasury", Some(body_of(&params)?)).await?)
}

async fn get_treasury(client: Arc<dyn ApiClient>, params: TreasuryRef) -> ToolResult<Value> {
    let path = format!("/treasury/{}", segment(&params.treasury_id, "treasuryId")?);
    Ok(client.get(&path, None).await?)
}

pub fn tools() -> Vec<ToolDefinition> {
    use ToolKind::{Destructive, ReadOnly};

    vec![
        ToolDefinition::new(
            "list_treasuries",
            "List all treasury accounts with pagination support",
            ReadOnly,
            list_treasuries,
        ),
        ToolDefinition::new(
            "create_treasury",
            "Create a new treasury account",
            Destructive,
            create_treasury,
        ),
        ToolDefinition::new(
            "get_treasury",
            "Get a specific treasury account by ID",
            ReadOnly,
            get_treasury,
        ),
    ]
}
