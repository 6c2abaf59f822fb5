//! Expenses accounts.

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::common::{PageArgs, body_of, project_list, segment};
use crate::core::client::ApiClient;
use crate::domains::tools::{ToolDefinition, ToolKind, ToolResult};

const LIST_FIELDS: &[&str] = &["id", "name", "code"];

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NewExpensesAccount {
    #[schemars(description = "Expenses account name")]
    pub name: String,

    #[schemars(description = "Account code")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExpensesAccountChanges {
    #[schemars(description = "Expenses account name")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[schemars(description = "Account code")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpensesAccountRef {
    #[schemars(description = "Expenses account ID")]
    pub account_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpensesAccountParams {
    #[schemars(description = "Expenses account ID to update")]
    pub account_id: String,

    #[serde(flatten)]
    pub changes: ExpensesAccountChanges,
}

fn account_path(account_id: &str) -> ToolResult<String> {
    Ok(format!("/expensesaccounts/{}", segment(account_id, "accountId")?))
}

async fn list_expenses_accounts(client: Arc<dyn ApiClient>, params: PageArgs) -> ToolResult<Value> {
    let response = client.get("/expensesaccounts", None).await?;
    Ok(params.apply(project_list(response, LIST_FIELDS)?))
}

async fn create_expenses_account(
    client: Arc<dyn ApiClient>,
    params: NewExpensesAccount,
) -> ToolResult<Value> {
    Ok(client
        .post("/expensesaccounts", Some(body_of(&params)?))
        .await?)
}

async fn get_expenses_account(client: Arc<dyn ApiClient>, params: ExpensesAccountRef) -> ToolResult<Value> {
    Ok(client.get(&account_path(&params.account_id)?, None).await?)
}

async fn update_expenses_account(
    client: Arc<dyn ApiClient>,
    params: UpdateExpensesAccountParams,
) -> ToolResult<Value> {
    let path = account_path(&params.account_id)?;
    Ok(client.put(&path, Some(body_of(&params.changes)?)).await?)
}

async fn delete_expenses_account(
    client: Arc<dyn ApiClient>,
    params: ExpensesAccountRef,
) -> ToolResult<Value> {
    Ok(client.delete(&account_path(&params.account_id)?).await?)
}

pub fn tools() -> Vec<ToolDefinition> {
    use ToolKind::{Destructive, ReadOnly};

    vec![
        ToolDefinition::new(
            "list_expenses_accounts",
            "List all expenses accounts with pagination support",
            ReadOnly,
            list_expenses_accounts,
        ),
        ToolDefinition::new(
            "create_expenses_account",
            "Create a new expenses account",
            Destructive,
            create_expenses_account,
        ),
        ToolDefinition::new(
            "get_expenses_account",
            "Get a specific expenses account by ID",
            ReadOnly,
            get_expenses_account,
        ),
        ToolDefinition::new(
            "update_expenses_account",
            "Update an existing expenses account",
            Destructive,
            update_expenses_account,
        ),
        ToolDefinition::new(
            "delete_expenses_account",
            "Delete an expenses account",
            Destructive,
            delete_expenses_account,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::{Call, MockApiClient, run};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_expenses_accounts_keeps_code() {
        let tools = tools();
        let client = Arc::new(MockApiClient::new().with_get_response(json!([
            {"id": "a1", "name": "Rent", "code": "621", "balance": 1200}
        ])));
        let out = run(&tools, &client, "list_expenses_accounts", json!({})).await.unwrap();
        assert_eq!(out["items"], json!([{"id": "a1", "name": "Rent", "code": "621"}]));
        assert_eq!(out["total"], 1);
    }

    #[tokio::test]
    async fn test_expenses_account_crud_paths() {
        let tools = tools();
        let client = Arc::new(MockApiClient::new());
        run(
            &tools,
            &client,
            "create_expenses_account",
            json!({"name": "Travel", "code": "629"}),
        )
        .await
        .unwrap();
        run(&tools, &client, "get_expenses_account", json!({"accountId": "a1"}))
            .await
            .unwrap();
        run(
            &tools,
            &client,
            "update_expenses_account",
            json!({"accountId": "a1", "code": "6290"}),
        )
        .await
        .unwrap();
        run(&tools, &client, "delete_expenses_account", json!({"accountId": "a1"}))
            .await
            .unwrap();

        assert_eq!(
            client.calls(),
            vec![
                Call::Post {
                    path: "/expensesaccounts".into(),
                    body: Some(json!({"name": "Travel", "code": "629"})),
                },
                Call::Get { path: "/expensesaccounts/a1".into(), query: None },
                Call::Put {
                    path: "/expensesaccounts/a1".into(),
                    body: Some(json!({"code": "6290"})),
                },
                Call::Delete { path: "/expensesaccounts/a1".into() },
            ]
        );
    }
}
