//! Bank remittances (read-only).

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::common::{PageArgs, project_list, segment};
use crate::core::client::ApiClient;
use crate::domains::tools::{ToolDefinition, ToolKind, ToolResult};

const LIST_FIELDS: &[&str] = &["id", "name", "date"];

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemittanceRef {
    #[schemars(description = "Remittance ID")]
    pub remittance_id: String,
}

async fn list_remittances(client: Arc<dyn ApiClient>, params: PageArgs) -> ToolResult<Value> {
    let response = client.get("/remittances", None).await?;
    Ok(params.apply(project_list(response, LIST_FIELDS)?))
}

async fn get_remittance(client: Arc<dyn ApiClient>, params: RemittanceRef) -> ToolResult<Value> {
    let path = format!(
        "/remittances/{}",
        segment(&params.remittance_id, "remittanceId")?
    );
    Ok(client.get(&path, None).await?)
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list_remittances",
            "List all remittances with pagination support",
            ToolKind::ReadOnly,
            list_remittances,
        ),
        ToolDefinition::new(
            "get_remittance",
            "Get a specific remittance by ID",
            ToolKind::ReadOnly,
            get_remittance,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::{Call, MockApiClient, run};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_and_get_remittances() {
        let tools = tools();
        let client = Arc::new(MockApiClient::new().with_get_response(json!([
            {"id": "r1", "name": "March", "date": 1711929600, "total": 900}
        ])));

        let out = run(&tools, &client, "list_remittances", json!({})).await.unwrap();
        assert_eq!(
            out["items"],
            json!([{"id": "r1", "name": "March", "date": 1711929600}])
        );
        assert_eq!(out["page"], 1);

        run(&tools, &client, "get_remittance", json!({"remittanceId": "r1"}))
            .await
            .unwrap();
        assert_eq!(
            client.calls()[1],
            Call::Get { path: "/remittances/r1".into(), query: None }
        );
    }
}
