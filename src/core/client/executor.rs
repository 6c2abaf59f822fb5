//! Retrying HTTP executor bound to one tenant's credential.

use async_trait::async_trait;
use reqwest::{
    Method, Response,
    header::CONTENT_TYPE,
    multipart::{Form, Part},
};
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::{ApiClient, ExecutionError, ExecutionResult, QueryParams, RetryPolicy};

/// Base URL of the Holded invoicing API.
pub const DEFAULT_BASE_URL: &str = "https://api.holded.com/api/invoicing/v1";

/// Header carrying the tenant's API key.
const AUTH_HEADER: &str = "key";

/// Executes calls against a fixed base URL, retrying transient failures.
///
/// Cloning is cheap: the underlying `reqwest::Client` and the retry policy
/// are shared.
#[derive(Clone)]
pub struct RequestExecutor {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    policy: Arc<RetryPolicy>,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("policy", &self.policy)
            .finish()
    }
}

impl RequestExecutor {
    /// Create an executor sharing `http` and `policy` with other tenants.
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        policy: Arc<RetryPolicy>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            policy,
        }
    }

    /// Build the HTTP client shared by all executors.
    ///
    /// `timeout` bounds each individual attempt, not the whole retry sequence.
    pub fn http_client(timeout: Duration) -> ExecutionResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ExecutionError::from)
    }

    /// Same transport, base URL and policy, bound to another credential.
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            api_key: api_key.into(),
            policy: self.policy.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Target URL for `path`, with the encoded query appended when non-empty.
    pub fn build_url(&self, path: &str, query: Option<&QueryParams>) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(&query.encode());
        }
        url
    }

    /// Perform one logical JSON call.
    ///
    /// `body` is only sent for POST and PUT.
    #[instrument(skip(self, body, query), fields(method = %method))]
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: Option<&QueryParams>,
    ) -> ExecutionResult<Value> {
        let url = self.build_url(path, query);
        let body = body.filter(|_| method == Method::POST || method == Method::PUT);
        self.with_retry(|| self.send_json(method.clone(), &url, body))
            .await
    }

    /// Upload `file` as the `file` field of a multipart POST.
    #[instrument(skip(self, file), fields(size = file.len()))]
    pub async fn upload(&self, path: &str, file: Vec<u8>, filename: &str) -> ExecutionResult<Value> {
        let url = self.build_url(path, None);
        self.with_retry(|| {
            // A multipart form is consumed by the request, so rebuild it per attempt.
            let part = Part::bytes(file.clone()).file_name(filename.to_string());
            self.send_multipart(&url, Form::new().part("file", part))
        })
        .await
    }

    /// Run `attempt` until it succeeds, fails permanently, or the policy is spent.
    async fn with_retry<F, Fut>(&self, mut attempt: F) -> ExecutionResult<Value>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ExecutionResult<Value>>,
    {
        let attempts = self.policy.attempts();
        let mut last_error = None;

        for index in 0..attempts {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() => {
                    if index + 1 < attempts {
                        let delay = self.policy.delay_for(index);
                        warn!(
                            attempt = index + 1,
                            max_attempts = attempts,
                            delay_ms = delay.as_millis() as u64,
                            "Retryable failure: {}",
                            err
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        warn!("Giving up after {} attempt(s)", attempts);
        Err(last_error.unwrap_or(ExecutionError::Exhausted { attempts }))
    }

    async fn send_json(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> ExecutionResult<Value> {
        debug!("{} {}", method, url);
        let mut request = self
            .http
            .request(method, url)
            .header(AUTH_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        self.read_response(response).await
    }

    async fn send_multipart(&self, url: &str, form: Form) -> ExecutionResult<Value> {
        debug!("POST {} (multipart)", url);
        let response = self
            .http
            .post(url)
            .header(AUTH_HEADER, &self.api_key)
            .multipart(form)
            .send()
            .await?;
        self.read_response(response).await
    }

    async fn read_response(&self, response: Response) -> ExecutionResult<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let status = status.as_u16();
            return Err(if self.policy.is_retryable_status(status) {
                ExecutionError::RetryableStatus { status, body: text }
            } else {
                ExecutionError::Status { status, body: text }
            });
        }

        // Some endpoints answer with an empty body.
        if text.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        serde_json::from_str(&text).map_err(|e| ExecutionError::parse(e.to_string()))
    }
}

#[async_trait]
impl ApiClient for RequestExecutor {
    async fn get(&self, path: &str, query: Option<QueryParams>) -> ExecutionResult<Value> {
        self.execute(Method::GET, path, None, query.as_ref()).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> ExecutionResult<Value> {
        self.execute(Method::POST, path, body.as_ref(), None).await
    }

    async fn put(&self, path: &str, body: Option<Value>) -> ExecutionResult<Value> {
        self.execute(Method::PUT, path, body.as_ref(), None).await
    }

    async fn delete(&self, path: &str) -> ExecutionResult<Value> {
        self.execute(Method::DELETE, path, None, None).await
    }

    async fn upload_file(
        &self,
        path: &str,
        file: Vec<u8>,
        filename: &str,
    ) -> ExecutionResult<Value> {
        self.upload(path, file, filename).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Instant;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_policy(max_attempts: u32) -> Arc<RetryPolicy> {
        Arc::new(RetryPolicy {
            max_attempts,
            backoff_schedule_ms: vec![10, 20, 40],
            retryable_status_codes: vec![429, 502, 503, 504],
        })
    }

    fn executor(server: &MockServer, policy: Arc<RetryPolicy>) -> RequestExecutor {
        let http = RequestExecutor::http_client(Duration::from_secs(5)).unwrap();
        RequestExecutor::new(http, server.uri(), "test-api-key", policy)
    }

    async fn request_count(server: &MockServer) -> usize {
        server.received_requests().await.unwrap().len()
    }

    #[test]
    fn test_build_url_without_query_has_no_question_mark() {
        let http = reqwest::Client::new();
        let exec = RequestExecutor::new(http, DEFAULT_BASE_URL, "k", fast_policy(1));
        assert_eq!(
            exec.build_url("/contacts", Some(&QueryParams::new())),
            "https://api.holded.com/api/invoicing/v1/contacts"
        );
        assert_eq!(
            exec.build_url("/contacts", None),
            "https://api.holded.com/api/invoicing/v1/contacts"
        );

        let mut query = QueryParams::new();
        query.push("page", 2).push("limit", 50);
        assert_eq!(
            exec.build_url("/contacts", Some(&query)),
            "https://api.holded.com/api/invoicing/v1/contacts?page=2&limit=50"
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let exec = RequestExecutor::new(
            reqwest::Client::new(),
            DEFAULT_BASE_URL,
            "super_secret_key",
            fast_policy(1),
        );
        let debug_str = format!("{:?}", exec);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }

    #[tokio::test]
    async fn test_get_sends_credential_and_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/contacts"))
            .and(header("key", "test-api-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "test"})))
            .expect(1)
            .mount(&server)
            .await;

        let exec = executor(&server, fast_policy(4));
        let result = exec.get("/contacts", None).await.unwrap();
        assert_eq!(result, json!({"data": "test"}));
    }

    #[tokio::test]
    async fn test_get_appends_query_in_insertion_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/contacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let mut query = QueryParams::new();
        query.push("page", 2).push("limit", 50);
        executor(&server, fast_policy(1))
            .get("/contacts", Some(query))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), Some("page=2&limit=50"));
    }

    #[tokio::test]
    async fn test_empty_body_decodes_to_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let result = executor(&server, fast_policy(1))
            .delete("/contacts/123")
            .await
            .unwrap();
        assert_eq!(result, json!({}));
    }

    #[tokio::test]
    async fn test_post_and_put_send_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts"))
            .and(body_json(json!({"name": "Test Contact"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "new-123"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/contacts/123"))
            .and(body_json(json!({"name": "Updated Contact"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let exec = executor(&server, fast_policy(1));
        let created = exec
            .post("/contacts", Some(json!({"name": "Test Contact"})))
            .await
            .unwrap();
        assert_eq!(created["id"], "new-123");
        exec.put("/contacts/123", Some(json!({"name": "Updated Contact"})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_body_ignored_for_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        executor(&server, fast_policy(1))
            .execute(Method::GET, "/taxes", Some(&json!({"x": 1})), None)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_non_retryable_status_makes_one_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = executor(&server, fast_policy(4))
            .get("/contacts", None)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Holded API error (401): Unauthorized");
        assert!(matches!(err, ExecutionError::Status { status: 401, .. }));
        assert_eq!(request_count(&server).await, 1);
    }

    #[tokio::test]
    async fn test_server_error_outside_retryable_set_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = executor(&server, fast_policy(4))
            .get("/contacts", None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(request_count(&server).await, 1);
    }

    #[tokio::test]
    async fn test_recovers_after_three_429_with_four_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .up_to_n_times(3)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let result = executor(&server, fast_policy(4))
            .get("/contacts", None)
            .await
            .unwrap();
        assert_eq!(result, json!({"ok": true}));
        assert_eq!(request_count(&server).await, 4);
    }

    #[tokio::test]
    async fn test_surfaces_last_429_when_attempts_run_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .up_to_n_times(3)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let err = executor(&server, fast_policy(3))
            .get("/contacts", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::RetryableStatus { status: 429, .. }));
        assert_eq!(request_count(&server).await, 3);
    }

    #[tokio::test]
    async fn test_each_retryable_status_is_retried_up_to_max_attempts() {
        for status in [429u16, 502, 503, 504] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let err = executor(&server, fast_policy(3))
                .get("/taxes", None)
                .await
                .unwrap_err();
            assert_eq!(err.status(), Some(status));
            assert_eq!(request_count(&server).await, 3);
        }
    }

    #[tokio::test]
    async fn test_waits_backoff_between_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let policy = Arc::new(RetryPolicy {
            max_attempts: 3,
            backoff_schedule_ms: vec![50, 100],
            retryable_status_codes: vec![503],
        });
        let started = Instant::now();
        let _ = executor(&server, policy).get("/taxes", None).await;
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_parse_error_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = executor(&server, fast_policy(4))
            .get("/contacts", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Parse(_)));
        assert_eq!(request_count(&server).await, 1);
    }

    #[tokio::test]
    async fn test_network_failure_is_retried_then_surfaced() {
        // Nothing listens on port 9 of the loopback interface.
        let http = RequestExecutor::http_client(Duration::from_secs(2)).unwrap();
        let exec = RequestExecutor::new(http, "http://127.0.0.1:9", "k", fast_policy(2));
        let err = exec.get("/contacts", None).await.unwrap_err();
        assert!(matches!(err, ExecutionError::Network(_)));
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_without_json_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/documents/invoice/123/attach"))
            .and(header("key", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let result = executor(&server, fast_policy(1))
            .upload_file(
                "/documents/invoice/123/attach",
                b"test file content".to_vec(),
                "test.pdf",
            )
            .await
            .unwrap();
        assert_eq!(result, json!({"status": 1}));

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("filename=\"test.pdf\""));
        assert!(body.contains("test file content"));
    }

    #[tokio::test]
    async fn test_upload_follows_retry_contract() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let result = executor(&server, fast_policy(2))
            .upload_file("/documents/invoice/1/attach", vec![1, 2, 3], "a.bin")
            .await
            .unwrap();
        assert_eq!(result, json!({}));
        assert_eq!(request_count(&server).await, 2);
    }
}
