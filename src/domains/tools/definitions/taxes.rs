//! Tax rates configured in the account.

use serde_json::Value;
use std::sync::Arc;

use super::common::{PageArgs, project_list};
use crate::core::client::ApiClient;
use crate::domains::tools::{ToolDefinition, ToolKind, ToolResult};

const LIST_FIELDS: &[&str] = &["id", "name", "percentage"];

async fn get_taxes(client: Arc<dyn ApiClient>, params: PageArgs) -> ToolResult<Value> {
    let response = client.get("/taxes", None).await?;
    Ok(params.apply(project_list(response, LIST_FIELDS)?))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![ToolDefinition::new(
        "get_taxes",
        "Get all available taxes with pagination support",
        ToolKind::ReadOnly,
        get_taxes,
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::{MockApiClient, run};
    use serde_json::json;

    #[tokio::test]
    async fn test_get_taxes_projects_and_paginates() {
        let tools = tools();
        let taxes: Vec<Value> = (0..120)
            .map(|i| json!({"id": format!("t{i}"), "name": "IVA", "percentage": 21, "type": "sales"}))
            .collect();
        let client = Arc::new(MockApiClient::new().with_get_response(Value::Array(taxes)));

        let out = run(&tools, &client, "get_taxes", json!({"page": 3})).await.unwrap();
        assert_eq!(out["total"], 120);
        assert_eq!(out["totalPages"], 3);
        assert_eq!(out["pageSize"], 50);
        let items = out["items"].as_array().unwrap();
        assert_eq!(items.len(), 20);
        assert_eq!(items[0], json!({"id": "t100", "name": "IVA", "percentage": 21}));
    }
}
