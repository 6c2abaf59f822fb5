//! Tenant registry: owns every tenant's execution context.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::{TenantConfig, TenantError, TenantResult};
use crate::core::client::RequestExecutor;

/// Everything needed to run a call on behalf of one tenant.
#[derive(Debug)]
pub struct TenantContext {
    pub tenant_id: String,
    pub config: TenantConfig,
    pub executor: Arc<RequestExecutor>,
}

impl TenantContext {
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Display name, falling back to the tenant id.
    pub fn display_name(&self) -> &str {
        self.config
            .display_name
            .as_deref()
            .unwrap_or(&self.tenant_id)
    }
}

/// The set of configured tenants.
///
/// Built once at startup, then shared read-only behind an `Arc`.
#[derive(Debug)]
pub struct TenantRegistry {
    /// Transport, base URL and retry policy cloned into every tenant's executor.
    prototype: RequestExecutor,
    tenants: HashMap<String, Arc<TenantContext>>,
    /// Registration order, for stable listings.
    order: Vec<String>,
    default_id: Option<String>,
    default_is_explicit: bool,
}

impl TenantRegistry {
    /// Create an empty registry whose executors are derived from `prototype`.
    pub fn new(prototype: RequestExecutor) -> Self {
        Self {
            prototype,
            tenants: HashMap::new(),
            order: Vec::new(),
            default_id: None,
            default_is_explicit: false,
        }
    }

    /// Build a registry from a list of tenant records, in order.
    pub fn from_configs(
        prototype: RequestExecutor,
        configs: impl IntoIterator<Item = TenantConfig>,
    ) -> TenantResult<Self> {
        let mut registry = Self::new(prototype);
        for config in configs {
            registry.register(config)?;
        }
        Ok(registry)
    }

    /// Add a tenant.
    ///
    /// The first tenant registered becomes the default unless a tenant is
    /// explicitly flagged `default`; at most one tenant may carry that flag.
    pub fn register(&mut self, mut config: TenantConfig) -> TenantResult<()> {
        let tenant_id = config.tenant_id.trim().to_string();
        if tenant_id.is_empty() {
            return Err(TenantError::EmptyId);
        }
        if self.tenants.contains_key(&tenant_id) {
            return Err(TenantError::Duplicate(tenant_id));
        }
        if config.enabled && config.api_key.trim().is_empty() {
            return Err(TenantError::MissingApiKey(tenant_id));
        }

        if config.default {
            if self.default_is_explicit {
                return Err(TenantError::MultipleDefaults {
                    first: self.default_id.clone().unwrap_or_default(),
                    second: tenant_id,
                });
            }
            self.default_id = Some(tenant_id.clone());
            self.default_is_explicit = true;
        } else if self.default_id.is_none() {
            self.default_id = Some(tenant_id.clone());
        }

        config.tenant_id = tenant_id.clone();
        let executor = Arc::new(self.prototype.with_api_key(config.api_key.trim()));
        info!(
            tenant = %tenant_id,
            enabled = config.enabled,
            "Registered tenant"
        );

        self.order.push(tenant_id.clone());
        self.tenants.insert(
            tenant_id.clone(),
            Arc::new(TenantContext {
                tenant_id,
                config,
                executor,
            }),
        );
        Ok(())
    }

    /// Resolve a tenant by id, or the default tenant when `tenant_id` is `None`.
    ///
    /// Disabled tenants resolve; callers check [`Self::is_enabled`].
    pub fn resolve(&self, tenant_id: Option<&str>) -> TenantResult<Arc<TenantContext>> {
        let result = match tenant_id {
            Some(id) => self
                .tenants
                .get(id)
                .cloned()
                .ok_or_else(|| TenantError::NotFound(id.to_string())),
            None => self.default_tenant().ok_or(TenantError::NoDefault),
        };
        debug!(requested = ?tenant_id, found = result.is_ok(), "Resolved tenant");
        result
    }

    pub fn is_enabled(&self, context: &TenantContext) -> bool {
        context.is_enabled()
    }

    pub fn default_tenant(&self) -> Option<Arc<TenantContext>> {
        self.default_id
            .as_ref()
            .and_then(|id| self.tenants.get(id))
            .cloned()
    }

    /// Tenant ids in registration order.
    pub fn tenant_ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}
