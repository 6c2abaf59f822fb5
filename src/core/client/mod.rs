//! Client layer for the Holded invoicing API.
//!
//! - `executor`: the retrying HTTP [`RequestExecutor`]
//! - `retry`: the shared [`RetryPolicy`]
//! - `query`: ordered query-string building
//! - `error`: [`ExecutionError`], the terminal outcome of a failed call
//!
//! Tool handlers never see `RequestExecutor` directly; they talk to the
//! [`ApiClient`] trait so they can be exercised against a mock.

mod error;
mod executor;
mod query;
mod retry;

use async_trait::async_trait;
use serde_json::Value;

pub use error::{ExecutionError, ExecutionResult};
pub use executor::{DEFAULT_BASE_URL, RequestExecutor};
pub use query::QueryParams;
pub use retry::RetryPolicy;

/// The operations tool handlers may perform against the remote API.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// GET `path`, with optional query parameters.
    async fn get(&self, path: &str, query: Option<QueryParams>) -> ExecutionResult<Value>;

    /// POST `path` with an optional JSON body.
    async fn post(&self, path: &str, body: Option<Value>) -> ExecutionResult<Value>;

    /// PUT `path` with an optional JSON body.
    async fn put(&self, path: &str, body: Option<Value>) -> ExecutionResult<Value>;

    /// DELETE `path`.
    async fn delete(&self, path: &str) -> ExecutionResult<Value>;

    /// POST a single file to `path` as `multipart/form-data`.
    async fn upload_file(&self, path: &str, file: Vec<u8>, filename: &str)
    -> ExecutionResult<Value>;
}
