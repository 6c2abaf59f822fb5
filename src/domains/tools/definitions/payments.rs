//! Payment terms.

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::common::{WindowArgs, body_of, project_list, push_date_range, segment};
use crate::core::client::{ApiClient, QueryParams};
use crate::domains::tools::{ToolDefinition, ToolKind, ToolResult};

const LIST_FIELDS: &[&str] = &["id", "name", "days", "discount"];

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListPaymentsParams {
    #[serde(flatten)]
    pub window: WindowArgs,

    #[schemars(description = "Starting timestamp (Unix timestamp) for filtering payments by date")]
    pub starttmp: Option<String>,

    #[schemars(description = "Ending timestamp (Unix timestamp) for filtering payments by date")]
    pub endtmp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NewPayment {
    #[schemars(description = "Payment method name")]
    pub name: String,

    #[schemars(description = "Days until due")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PaymentChanges {
    #[schemars(description = "Payment method name")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[schemars(description = "Days until due")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRef {
    #[schemars(description = "Payment ID")]
    pub payment_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentParams {
    #[schemars(description = "Payment ID to update")]
    pub payment_id: String,

    #[serde(flatten)]
    pub changes: PaymentChanges,
}

fn payment_path(payment_id: &str) -> ToolResult<String> {
    Ok(format!("/payments/{}", segment(payment_id, "paymentId")?))
}

async fn list_payments(client: Arc<dyn ApiClient>, params: ListPaymentsParams) -> ToolResult<Value> {
    let mut query = QueryParams::new();
    params.window.push_query(&mut query);
    push_date_range(
        &mut query,
        params.starttmp.as_deref(),
        params.endtmp.as_deref(),
    );
    let response = client.get("/payments", Some(query)).await?;
    Ok(params.window.apply(project_list(response, LIST_FIELDS)?))
}

async fn create_payment(client: Arc<dyn ApiClient>, params: NewPayment) -> ToolResult<Value> {
    Ok(client.post("/payments", Some(body_of(&params)?)).await?)
}

async fn get_payment(client: Arc<dyn ApiClient>, params: PaymentRef) -> ToolResult<Value> {
    Ok(client.get(&payment_path(&params.payment_id)?, None).await?)
}

async fn update_payment(client: Arc<dyn ApiClient>, params: UpdatePaymentParams) -> ToolResult<Value> {
    let path = payment_path(&params.payment_id)?;
    Ok(client.put(&path, Some(body_of(&params.changes)?)).await?)
}

async fn delete_payment(client: Arc<dyn ApiClient>, params: PaymentRef) -> ToolResult<Value> {
    Ok(client.delete(&payment_path(&params.payment_id)?).await?)
}

pub fn tools() -> Vec<ToolDefinition> {
    use ToolKind::{Destructive, ReadOnly};

    vec![
        ToolDefinition::new(
            "list_payments",
            "List all payments with optional filters for date range",
            ReadOnly,
            list_payments,
        ),
        ToolDefinition::new("create_payment", "Create a new payment", Destructive, create_payment),
        ToolDefinition::new("get_payment", "Get a specific payment by ID", ReadOnly, get_payment),
        ToolDefinition::new("update_payment", "Update an existing payment", Destructive, update_payment),
        ToolDefinition::new("delete_payment", "Delete a payment", Destructive, delete_payment),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::{Call, MockApiClient, query_of, run};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_payments_query_and_projection() {
        let tools = tools();
        let client = Arc::new(MockApiClient::new().with_get_response(json!([
            {"id": "p1", "name": "30 days", "days": 30, "discount": 0, "notes": "-"}
        ])));
        let out = run(
            &tools,
            &client,
            "list_payments",
            json!({"page": 1, "starttmp": "100", "endtmp": "200"}),
        )
        .await
        .unwrap();
        assert_eq!(query_of(&client.only_call()), "page=1&starttmp=100&endtmp=200");
        assert_eq!(
            out,
            json!({
                "items": [{"id": "p1", "name": "30 days", "days": 30, "discount": 0}],
                "page": 1,
                "pageSize": 1,
                "hasMore": false
            })
        );
    }

    #[tokio::test]
    async fn test_payment_crud_paths() {
        let tools = tools();
        let client = Arc::new(MockApiClient::new());
        run(&tools, &client, "create_payment", json!({"name": "Cash", "days": 0}))
            .await
            .unwrap();
        run(&tools, &client, "get_payment", json!({"paymentId": "p1"})).await.unwrap();
        run(&tools, &client, "update_payment", json!({"paymentId": "p1", "days": 60}))
            .await
            .unwrap();
        run(&tools, &client, "delete_payment", json!({"paymentId": "p1"})).await.unwrap();

        assert_eq!(
            client.calls(),
            vec![
                Call::Post {
                    path: "/payments".into(),
                    body: Some(json!({"name": "Cash", "days": 0})),
                },
                Call::Get { path: "/payments/p1".into(), query: None },
                Call::Put {
                    path: "/payments/p1".into(),
                    body: Some(json!({"days": 60})),
                },
                Call::Delete { path: "/payments/p1".into() },
            ]
        );
    }
}
