//! Tenant records and how they are read from configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use super::{TenantError, TenantResult};

/// Argument name that selects the tenant for a tool call.
pub const TENANT_ID_ARGUMENT: &str = "tenantId";

/// One configured Holded account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    pub tenant_id: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Marks this tenant as the one used when a call names no tenant.
    #[serde(default)]
    pub default: bool,
}

fn default_enabled() -> bool {
    true
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for TenantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantConfig")
            .field("tenant_id", &self.tenant_id)
            .field(
                "api_key",
                &(!self.api_key.is_empty()).then_some("[REDACTED]"),
            )
            .field("enabled", &self.enabled)
            .field("display_name", &self.display_name)
            .field("default", &self.default)
            .finish()
    }
}

impl TenantConfig {
    /// An enabled tenant with the given credential.
    pub fn new(tenant_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            api_key: api_key.into(),
            enabled: true,
            display_name: None,
            default: false,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    /// Parse a JSON array of tenant records.
    pub fn parse_list(json: &str) -> TenantResult<Vec<Self>> {
        serde_json::from_str(json).map_err(|e| TenantError::invalid(e.to_string()))
    }

    /// Read a JSON array of tenant records from `path`.
    pub fn load_file(path: impl AsRef<Path>) -> TenantResult<Vec<Self>> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| TenantError::invalid(format!("{}: {}", path.display(), e)))?;
        Self::parse_list(&json)
    }
}

/// Remove the tenant selector from a tool call's arguments.
///
/// Empty or non-string values select the default tenant.
pub fn extract_tenant_id(arguments: &mut Map<String, Value>) -> Option<String> {
    match arguments.remove(TENANT_ID_ARGUMENT) {
        Some(Value::String(id)) if !id.trim().is_empty() => Some(id.trim().to_string()),
        _ => None,
    }
}
