//! In-memory [`ApiClient`] for tool handler tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

use crate::core::client::{ApiClient, ExecutionError, ExecutionResult, QueryParams};

/// One recorded call against the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get {
        path: String,
        query: Option<QueryParams>,
    },
    Post {
        path: String,
        body: Option<Value>,
    },
    Put {
        path: String,
        body: Option<Value>,
    },
    Delete {
        path: String,
    },
    Upload {
        path: String,
        file: Vec<u8>,
        filename: String,
    },
}

/// Records every call and answers with canned JSON.
#[derive(Debug)]
pub struct MockApiClient {
    calls: Mutex<Vec<Call>>,
    get_response: Value,
    failure: Option<ExecutionError>,
}

impl Default for MockApiClient {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            get_response: json!([]),
            failure: None,
        }
    }
}

impl MockApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared mock with default answers, for tests that ignore the calls.
    pub fn shared() -> Arc<dyn ApiClient> {
        Arc::new(Self::new())
    }

    /// Answer every GET with `response`.
    pub fn with_get_response(mut self, response: Value) -> Self {
        self.get_response = response;
        self
    }

    /// Fail every call with `error`.
    pub fn failing(mut self, error: ExecutionError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// The single recorded call; panics if there is not exactly one.
    pub fn only_call(&self) -> Call {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one call, got {calls:?}");
        calls.into_iter().next().unwrap()
    }

    fn record(&self, call: Call, answer: Value) -> ExecutionResult<Value> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(answer),
        }
    }
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn get(&self, path: &str, query: Option<QueryParams>) -> ExecutionResult<Value> {
        let call = Call::Get {
            path: path.to_string(),
            query,
        };
        self.record(call, self.get_response.clone())
    }

    async fn post(&self, path: &str, body: Option<Value>) -> ExecutionResult<Value> {
        let call = Call::Post {
            path: path.to_string(),
            body,
        };
        self.record(call, json!({"id": "new-id", "success": true}))
    }

    async fn put(&self, path: &str, body: Option<Value>) -> ExecutionResult<Value> {
        let call = Call::Put {
            path: path.to_string(),
            body,
        };
        self.record(call, json!({"success": true}))
    }

    async fn delete(&self, path: &str) -> ExecutionResult<Value> {
        let call = Call::Delete {
            path: path.to_string(),
        };
        self.record(call, json!({"success": true}))
    }

    async fn upload_file(&self, path: &str, file: Vec<u8>, filename: &str) -> ExecutionResult<Value> {
        let call = Call::Upload {
            path: path.to_string(),
            file,
            filename: filename.to_string(),
        };
        self.record(call, json!({"success": true}))
    }
}

/// Turn a `json!({...})` literal into call arguments.
pub fn args(value: Value) -> rmcp::model::JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("arguments must be an object, got {other}"),
    }
}

/// Run the tool `name` from `tools` against `client`.
pub async fn run(
    tools: &[super::super::ToolDefinition],
    client: &Arc<MockApiClient>,
    name: &str,
    arguments: Value,
) -> super::super::ToolResult<Value> {
    let tool = tools
        .iter()
        .find(|t| t.name() == name)
        .unwrap_or_else(|| panic!("no tool named {name}"));
    let client: Arc<dyn ApiClient> = client.clone();
    tool.call(client, args(arguments)).await
}

/// Query pairs of a GET call, for compact assertions.
pub fn query_of(call: &Call) -> String {
    match call {
        Call::Get { query, .. } => query.as_ref().map(QueryParams::encode).unwrap_or_default(),
        other => panic!("expected a GET, got {other:?}"),
    }
}
