//! Tool definitions, one module per Holded resource family.
//!
//! Each module exposes `tools()`, returning its [`ToolDefinition`]s.

pub mod common;
pub mod contact_groups;
pub mod contacts;
pub mod documents;
pub mod expenses_accounts;
pub mod numbering_series;
pub mod payments;
pub mod products;
pub mod remittances;
pub mod sales_channels;
pub mod services;
pub mod taxes;
pub mod treasuries;
pub mod warehouses;

#[cfg(test)]
pub mod test_support;

use super::ToolDefinition;

pub use documents::DocType;

/// Every tool definition, grouped by family.
pub fn all() -> Vec<ToolDefinition> {
    [
        documents::tools(),
        contacts::tools(),
        products::tools(),
        services::tools(),
        payments::tools(),
        treasuries::tools(),
        taxes::tools(),
        remittances::tools(),
        contact_groups::tools(),
        sales_channels::tools(),
        expenses_accounts::tools(),
        numbering_series::tools(),
        warehouses::tools(),
    ]
    .into_iter()
    .flatten()
    .collect()
}
