//! Helpers shared by the tool definitions.
//!
//! List tools post-process the remote response in one of two ways:
//!
//! - **limit window**: the API is asked for `limit` records and the answer is
//!   cut to at most `limit` projected records (`{items, page, pageSize, hasMore}`).
//! - **local pagination**: the API returns everything and pages are sliced
//!   here (`{items, page, pageSize, total, totalPages}`).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::core::client::QueryParams;
use crate::domains::tools::{ToolError, ToolResult};

/// Page size used when the caller gives none.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Upper bound for `limit` and `pageSize`.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Parameters of tools that take no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Arguments of list tools that forward `page`/`limit` to the API.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct WindowArgs {
    #[schemars(description = "Page number for pagination (optional)")]
    pub page: Option<u32>,

    #[schemars(description = "Maximum number of items to return (default: 50, max: 500)")]
    pub limit: Option<u32>,

    #[schemars(
        description = "Return only count and pagination metadata without items (default: false)"
    )]
    #[serde(default)]
    pub summary: bool,
}

impl WindowArgs {
    /// Append `page` and the capped `limit`. Zero values are omitted.
    pub fn push_query(&self, query: &mut QueryParams) {
        query.push_opt("page", self.page.filter(|p| *p > 0));
        query.push_opt(
            "limit",
            self.limit.filter(|l| *l > 0).map(|l| l.min(MAX_PAGE_SIZE)),
        );
    }

    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE) as usize
    }

    /// Cut projected records to the window and shape the output.
    pub fn apply(&self, records: Vec<Value>) -> Value {
        let limit = self.effective_limit();
        let total = records.len();
        let items: Vec<Value> = records.into_iter().take(limit).collect();
        let has_more = items.len() == limit && total > limit;

        if self.summary {
            return json!({ "count": items.len(), "hasMore": has_more });
        }

        let mut out = Map::new();
        out.insert("pageSize".into(), json!(items.len()));
        out.insert("hasMore".into(), json!(has_more));
        if let Some(page) = self.page {
            out.insert("page".into(), json!(page));
        }
        out.insert("items".into(), Value::Array(items));
        Value::Object(out)
    }
}

/// Arguments of list tools paginated locally.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageArgs {
    #[schemars(description = "Page number (starting from 1, default: 1)")]
    pub page: Option<u32>,

    #[schemars(description = "Number of items per page (default: 50, max: 500)")]
    pub page_size: Option<u32>,

    #[schemars(
        description = "Return only total count and page count without items (default: false)"
    )]
    #[serde(default)]
    pub summary: bool,
}

impl PageArgs {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1) as usize
    }

    /// Effective page size, never zero.
    pub fn page_size(&self) -> usize {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE) as usize
    }

    /// Slice the requested page out of all projected records.
    pub fn apply(&self, records: Vec<Value>) -> Value {
        let page = self.page();
        let page_size = self.page_size();
        let total = records.len();
        let total_pages = total.div_ceil(page_size);

        if self.summary {
            return json!({ "total": total, "totalPages": total_pages });
        }

        let start = (page - 1).saturating_mul(page_size);
        let items: Vec<Value> = records.into_iter().skip(start).take(page_size).collect();
        json!({
            "items": items,
            "page": page,
            "pageSize": page_size,
            "total": total,
            "totalPages": total_pages,
        })
    }
}

/// Keep only `fields` of a record. Missing fields are left out.
pub fn project(record: &Value, fields: &[&str]) -> Value {
    let mut out = Map::new();
    if let Value::Object(source) = record {
        for field in fields {
            if let Some(value) = source.get(*field) {
                out.insert((*field).to_string(), value.clone());
            }
        }
    }
    Value::Object(out)
}

/// Project every record of a list response.
pub fn project_list(response: Value, fields: &[&str]) -> ToolResult<Vec<Value>> {
    match response {
        Value::Array(records) => Ok(records.iter().map(|r| project(r, fields)).collect()),
        other => Err(ToolError::unexpected_response(format!(
            "expected a list, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Append a `starttmp`/`endtmp` range.
///
/// When only the start is given, the range ends now.
pub fn push_date_range(query: &mut QueryParams, starttmp: Option<&str>, endtmp: Option<&str>) {
    let starttmp = starttmp.filter(|s| !s.is_empty());
    let endtmp = endtmp.filter(|s| !s.is_empty());

    query.push_opt("starttmp", starttmp);
    match (starttmp, endtmp) {
        (_, Some(end)) => {
            query.push("endtmp", end);
        }
        (Some(_), None) => {
            query.push("endtmp", Utc::now().timestamp());
        }
        (None, None) => {}
    }
}

/// Validate an identifier interpolated into a URL path.
pub fn segment<'a>(value: &'a str, field: &str) -> ToolResult<&'a str> {
    if value.trim().is_empty() {
        return Err(ToolError::invalid_arguments(format!(
            "{field} must not be empty"
        )));
    }
    if value.contains(['/', '?', '#']) {
        return Err(ToolError::invalid_arguments(format!(
            "{field} contains characters not allowed in a path: {value}"
        )));
    }
    Ok(value)
}

/// Serialize typed params as a request body.
pub fn body_of<T: Serialize>(params: &T) -> ToolResult<Value> {
    serde_json::to_value(params)
        .map_err(|e| ToolError::invalid_arguments(format!("cannot encode request body: {e}")))
}

pub fn decode_base64(encoded: &str, field: &str) -> ToolResult<Vec<u8>> {
    BASE64
        .decode(encoded.trim())
        .map_err(|e| ToolError::invalid_arguments(format!("{field} is not valid base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({"id": i.to_string()})).collect()
    }

    #[test]
    fn test_window_defaults() {
        let args = WindowArgs::default();
        let out = args.apply(records(3));
        assert_eq!(out["pageSize"], 3);
        assert_eq!(out["hasMore"], false);
        assert!(out.get("page").is_none());
        assert_eq!(out["items"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_window_cuts_and_reports_more() {
        let args = WindowArgs {
            page: Some(2),
            limit: Some(2),
            summary: false,
        };
        let out = args.apply(records(5));
        assert_eq!(out["items"], json!([{"id": "0"}, {"id": "1"}]));
        assert_eq!(out["page"], 2);
        assert_eq!(out["pageSize"], 2);
        assert_eq!(out["hasMore"], true);
    }

    #[test]
    fn test_window_exact_fit_has_no_more() {
        let args = WindowArgs {
            limit: Some(3),
            ..Default::default()
        };
        assert_eq!(args.apply(records(3))["hasMore"], false);
    }

    #[test]
    fn test_window_summary() {
        let args = WindowArgs {
            limit: Some(2),
            summary: true,
            ..Default::default()
        };
        assert_eq!(args.apply(records(4)), json!({"count": 2, "hasMore": true}));
    }

    #[test]
    fn test_window_caps_limit() {
        let args = WindowArgs {
            page: Some(0),
            limit: Some(10_000),
            summary: false,
        };
        assert_eq!(args.effective_limit(), 500);

        let mut query = QueryParams::new();
        args.push_query(&mut query);
        assert_eq!(query.encode(), "limit=500");
    }

    #[test]
    fn test_local_pagination() {
        let args = PageArgs {
            page: Some(2),
            page_size: Some(2),
            summary: false,
        };
        let out = args.apply(records(5));
        assert_eq!(out["items"], json!([{"id": "2"}, {"id": "3"}]));
        assert_eq!(out["page"], 2);
        assert_eq!(out["pageSize"], 2);
        assert_eq!(out["total"], 5);
        assert_eq!(out["totalPages"], 3);
    }

    #[test]
    fn test_local_pagination_clamps() {
        let args = PageArgs {
            page: Some(0),
            page_size: Some(0),
            summary: false,
        };
        assert_eq!(args.page(), 1);
        assert_eq!(args.page_size(), 1);

        let big = PageArgs {
            page_size: Some(9_999),
            ..Default::default()
        };
        assert_eq!(big.page_size(), 500);
    }

    #[test]
    fn test_local_pagination_past_end_and_summary() {
        let args = PageArgs {
            page: Some(9),
            ..Default::default()
        };
        let out = args.apply(records(3));
        assert_eq!(out["items"], json!([]));
        assert_eq!(out["totalPages"], 1);

        let summary = PageArgs {
            summary: true,
            ..Default::default()
        };
        assert_eq!(summary.apply(vec![]), json!({"total": 0, "totalPages": 0}));
    }

    #[test]
    fn test_project_keeps_listed_fields() {
        let record = json!({"id": "1", "name": "Acme", "secret": true, "email": null});
        assert_eq!(
            project(&record, &["id", "name", "email", "missing"]),
            json!({"id": "1", "name": "Acme", "email": null})
        );
        assert_eq!(project(&json!("x"), &["id"]), json!({}));
    }

    #[test]
    fn test_project_list_rejects_non_lists() {
        let err = project_list(json!({"error": "nope"}), &["id"]).unwrap_err();
        assert!(matches!(err, ToolError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_date_range() {
        let mut query = QueryParams::new();
        push_date_range(&mut query, Some("100"), Some("200"));
        assert_eq!(query.encode(), "starttmp=100&endtmp=200");

        let mut query = QueryParams::new();
        push_date_range(&mut query, Some("100"), None);
        let end: i64 = query.get("endtmp").unwrap().parse().unwrap();
        assert!((end - Utc::now().timestamp()).abs() < 5);

        let mut query = QueryParams::new();
        push_date_range(&mut query, None, Some(""));
        assert!(query.is_empty());
    }

    #[test]
    fn test_segment_validation() {
        assert_eq!(segment("abc123", "contactId").unwrap(), "abc123");
        assert!(segment("  ", "contactId").is_err());
        let err = segment("a/../b", "contactId").unwrap_err();
        assert!(err.to_string().contains("contactId"));
    }

    #[test]
    fn test_decode_base64() {
        assert_eq!(decode_base64("aGVsbG8=", "fileBase64").unwrap(), b"hello");
        assert!(decode_base64("***", "fileBase64").is_err());
    }
}
