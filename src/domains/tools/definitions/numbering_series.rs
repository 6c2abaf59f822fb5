//! Numbering series used to number documents of each type.

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::common::{PageArgs, body_of, project_list, segment};
use super::documents::DocType;
use crate::core::client::ApiClient;
use crate::domains::tools::{ToolDefinition, ToolKind, ToolResult};

const LIST_FIELDS: &[&str] = &["id", "name", "prefix", "nextNumber"];

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListSeriesParams {
    #[serde(rename = "docType")]
    #[schemars(description = "Document type")]
    pub doc_type: DocType,

    #[serde(flatten)]
    pub pages: PageArgs,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SerieFields {
    #[schemars(description = "Serie prefix")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[schemars(description = "Next number in the serie")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_number: Option<u64>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateSerieParams {
    #[serde(rename = "docType")]
    #[schemars(description = "Document type")]
    pub doc_type: DocType,

    #[schemars(description = "Serie name")]
    pub name: String,

    #[serde(flatten)]
    pub fields: SerieFields,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSerieParams {
    #[schemars(description = "Document type")]
    pub doc_type: DocType,

    #[schemars(description = "Serie ID to update")]
    pub serie_id: String,

    #[schemars(description = "Serie name")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub fields: SerieFields,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SerieRef {
    #[schemars(description = "Document type")]
    pub doc_type: DocType,

    #[schemars(description = "Serie ID to delete")]
    pub serie_id: String,
}

/// Serialize `fields` with an optional `name` in front.
fn serie_body(name: Option<String>, fields: &SerieFields) -> ToolResult<Value> {
    let mut body = body_of(fields)?;
    if let (Some(name), Value::Object(map)) = (name, &mut body) {
        map.insert("name".into(), Value::String(name));
    }
    Ok(body)
}

async fn get_numbering_series(client: Arc<dyn ApiClient>, params: ListSeriesParams) -> ToolResult<Value> {
    let response = client
        .get(&format!("/numberseries/{}", params.doc_type), None)
        .await?;
    Ok(params.pages.apply(project_list(response, LIST_FIELDS)?))
}

async fn create_numbering_serie(client: Arc<dyn ApiClient>, params: CreateSerieParams) -> ToolResult<Value> {
    let body = serie_body(Some(params.name), &params.fields)?;
    Ok(client
        .post(&format!("/numberseries/{}", params.doc_type), Some(body))
        .await?)
}

async fn update_numbering_serie(client: Arc<dyn ApiClient>, params: UpdateSerieParams) -> ToolResult<Value> {
    let path = format!(
        "/numberseries/{}/{}",
        params.doc_type,
        segment(&params.serie_id, "serieId")?
    );
    let body = serie_body(params.name, &params.fields)?;
    Ok(client.put(&path, Some(body)).await?)
}

async fn delete_numbering_serie(client: Arc<dyn ApiClient>, params: SerieRef) -> ToolResult<Value> {
    let path = format!(
        "/numberseries/{}/{}",
        params.doc_type,
        segment(&params.serie_id, "serieId")?
    );
    Ok(client.delete(&path).await?)
}

pub fn tools() -> Vec<ToolDefinition> {
    use ToolKind::{Destructive, ReadOnly};

    vec![
        ToolDefinition::new(
            "get_numbering_series",
            "Get numbering series for a specific document type with pagination support",
            ReadOnly,
            get_numbering_series,
        ),
        ToolDefinition::new(
            "create_numbering_serie",
            "Create a new numbering serie",
            Destructive,
            create_numbering_serie,
        ),
        ToolDefinition::new(
            "update_numbering_serie",
            "Update an existing numbering serie",
            Destructive,
            update_numbering_serie,
        ),
        ToolDefinition::new(
            "delete_numbering_serie",
            "Delete a numbering serie",
            Destructive,
            delete_numbering_serie,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::{Call, MockApiClient, run};
    use serde_json::json;

    #[tokio::test]
    async fn test_get_numbering_series() {
        let tools = tools();
        let client = Arc::new(MockApiClient::new().with_get_response(json!([
            {"id": "n1", "name": "Default", "prefix": "F%YY%-", "nextNumber": 42, "last": 41}
        ])));
        let out = run(&tools, &client, "get_numbering_series", json!({"docType": "invoice"}))
            .await
            .unwrap();
        assert_eq!(
            out["items"],
            json!([{"id": "n1", "name": "Default", "prefix": "F%YY%-", "nextNumber": 42}])
        );
        assert_eq!(
            client.only_call(),
            Call::Get { path: "/numberseries/invoice".into(), query: None }
        );
    }

    #[tokio::test]
    async fn test_serie_write_operations() {
        let tools = tools();
        let client = Arc::new(MockApiClient::new());
        run(
            &tools,
            &client,
            "create_numbering_serie",
            json!({"docType": "estimate", "name": "Quotes", "prefix": "Q-", "nextNumber": 1}),
        )
        .await
        .unwrap();
        run(
            &tools,
            &client,
            "update_numbering_serie",
            json!({"docType": "estimate", "serieId": "n1", "nextNumber": 100}),
        )
        .await
        .unwrap();
        run(
            &tools,
            &client,
            "delete_numbering_serie",
            json!({"docType": "estimate", "serieId": "n1"}),
        )
        .await
        .unwrap();

        assert_eq!(
            client.calls(),
            vec![
                Call::Post {
                    path: "/numberseries/estimate".into(),
                    body: Some(json!({"name": "Quotes", "prefix": "Q-", "nextNumber": 1})),
                },
                Call::Put {
                    path: "/numberseries/estimate/n1".into(),
                    body: Some(json!({"nextNumber": 100})),
                },
                Call::Delete { path: "/numberseries/estimate/n1".into() },
            ]
        );
    }
}
