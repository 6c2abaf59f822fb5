//! Tenant configuration and resolution errors.

use thiserror::Error;

/// Result type for tenant operations.
pub type TenantResult<T> = Result<T, TenantError>;

/// Errors raised while loading, registering or resolving tenants.
#[derive(Debug, Error)]
pub enum TenantError {
    /// A tenant with this id is already registered.
    #[error("Tenant '{0}' is already registered")]
    Duplicate(String),

    /// An enabled tenant has no API key.
    #[error("Tenant '{0}' is enabled but has no API key")]
    MissingApiKey(String),

    /// Tenant ids must be non-empty.
    #[error("Tenant id must not be empty")]
    EmptyId,

    /// More than one tenant was flagged as default.
    #[error("Tenants '{first}' and '{second}' are both marked as default")]
    MultipleDefaults { first: String, second: String },

    /// The tenant list could not be read or parsed.
    #[error("Invalid tenant configuration: {0}")]
    Invalid(String),

    /// No tenant is registered under this id.
    #[error("Tenant '{0}' not found")]
    NotFound(String),

    /// No id was given and no default tenant exists.
    #[error("No default tenant available")]
    NoDefault,
}

impl TenantError {
    /// Create an invalid configuration error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// Whether this is a resolution failure rather than a configuration error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NoDefault)
    }
}
