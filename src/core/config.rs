//! Configuration management for the MCP server.
//!
//! Everything is read once at startup from environment variables (and an
//! optional `.env` file). Tenant credentials may also come from a JSON file.

use super::client::{DEFAULT_BASE_URL, RetryPolicy};
use super::error::{Error, Result};
use super::rate_limit::{RateLimitConfig, RateLimitRule};
use super::tenant::TenantConfig;
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Tenant id given to the single tenant built from `HOLDED_API_KEY`.
pub const SINGLE_TENANT_ID: &str = "default";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Remote API endpoint settings shared by all tenants.
    pub api: ApiConfig,

    /// Configured tenants, in registration order.
    pub tenants: Vec<TenantConfig>,

    pub rate_limit: RateLimitConfig,

    pub retry: RetryPolicy,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Where and how the remote API is reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,

    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "holded-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            api: ApiConfig::default(),
            tenants: Vec::new(),
            rate_limit: RateLimitConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Tenants come from the first source that is set:
    /// `HOLDED_TENANTS` (inline JSON array), `HOLDED_TENANTS_FILE` (path to the
    /// same array), then `HOLDED_API_KEY` as a single tenant named `default`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        if let Some(base_url) = non_empty_var("HOLDED_BASE_URL") {
            config.api.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Some(timeout) = parse_var::<u64>("HOLDED_REQUEST_TIMEOUT_SECS")? {
            config.api.timeout_secs = timeout;
        }

        config.tenants = tenants_from_env()?;

        if let Some(max_requests) = parse_var::<u32>("MCP_RATE_LIMIT_MAX_REQUESTS")? {
            config.rate_limit.default_rule.max_requests = max_requests;
        }

        if let Some(window_ms) = parse_var::<u64>("MCP_RATE_LIMIT_WINDOW_MS")? {
            config.rate_limit.default_rule.window_ms = window_ms;
        }

        Ok(config)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = self.rate_limit.invalid_rules();
        if !invalid.is_empty() {
            return Err(Error::config(format!(
                "rate limit rules must have positive maxRequests and windowMs: {}",
                invalid.join(", ")
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(Error::config("HOLDED_REQUEST_TIMEOUT_SECS must be positive"));
        }

        if self.tenants.is_empty() {
            warn!("No tenants configured; set HOLDED_API_KEY or HOLDED_TENANTS");
        }

        Ok(())
    }

    /// Override the rule for one tool.
    pub fn with_tool_limit(mut self, tool: impl Into<String>, rule: RateLimitRule) -> Self {
        self.rate_limit.tool_limits.insert(tool.into(), rule);
        self
    }
}

fn tenants_from_env() -> Result<Vec<TenantConfig>> {
    if let Some(json) = non_empty_var("HOLDED_TENANTS") {
        let tenants = TenantConfig::parse_list(&json)?;
        info!(count = tenants.len(), "Tenants loaded from HOLDED_TENANTS");
        return Ok(tenants);
    }

    if let Some(path) = non_empty_var("HOLDED_TENANTS_FILE") {
        let tenants = TenantConfig::load_file(&path)?;
        info!(count = tenants.len(), path = %path, "Tenants loaded from file");
        return Ok(tenants);
    }

    if let Some(api_key) = non_empty_var("HOLDED_API_KEY") {
        info!("Single tenant configured from HOLDED_API_KEY");
        return Ok(vec![TenantConfig::new(SINGLE_TENANT_ID, api_key)]);
    }

    Ok(Vec::new())
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::config(format!("{name} is not a valid number: {raw}"))),
        None => Ok(None),
    }
}
