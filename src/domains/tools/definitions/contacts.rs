//! Contacts: clients, suppliers, leads, debtors and creditors.

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use super::common::{WindowArgs, body_of, project_list, segment};
use crate::core::client::{ApiClient, QueryParams};
use crate::domains::tools::{ToolDefinition, ToolKind, ToolResult};

const LIST_FIELDS: &[&str] = &["id", "customId", "name", "email"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Client,
    Supplier,
    Lead,
    Debtor,
    Creditor,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListContactsParams {
    #[serde(flatten)]
    pub window: WindowArgs,

    #[schemars(description = "Filter by exact phone number")]
    pub phone: Option<String>,

    #[schemars(description = "Filter by exact mobile number")]
    pub mobile: Option<String>,

    #[schemars(description = "Filter by custom IDs")]
    pub custom_id: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    #[schemars(description = "Contact name")]
    pub name: String,

    #[schemars(description = "Contact email")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[schemars(description = "Contact phone")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[schemars(description = "VAT number")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vatnumber: Option<String>,

    #[schemars(description = "Contact type")]
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<ContactType>,

    #[schemars(description = "Billing address")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_address: Option<Address>,

    #[schemars(description = "Trade name")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tradename: Option<String>,

    #[schemars(description = "Contact code")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[schemars(description = "Notes about the contact")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactChanges {
    #[schemars(description = "Contact name")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[schemars(description = "Contact email")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[schemars(description = "Contact phone")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[schemars(description = "VAT number")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vatnumber: Option<String>,

    #[schemars(description = "Contact type")]
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<ContactType>,

    #[schemars(description = "Billing address")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_address: Option<Address>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRef {
    #[schemars(description = "Contact ID")]
    pub contact_id: String,
}

impl ContactRef {
    fn path(&self) -> ToolResult<String> {
        Ok(format!("/contacts/{}", segment(&self.contact_id, "contactId")?))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactParams {
    #[schemars(description = "Contact ID to update")]
    pub contact_id: String,

    #[serde(flatten)]
    pub changes: ContactChanges,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    #[schemars(description = "Contact ID")]
    pub contact_id: String,

    #[schemars(description = "Attachment ID")]
    pub attachment_id: String,
}

#[instrument(skip_all)]
async fn list_contacts(client: Arc<dyn ApiClient>, params: ListContactsParams) -> ToolResult<Value> {
    let mut query = QueryParams::new();
    params.window.push_query(&mut query);
    query
        .push_opt("phone", params.phone.as_deref().filter(|s| !s.is_empty()))
        .push_opt("mobile", params.mobile.as_deref().filter(|s| !s.is_empty()))
        .push_list("customId", params.custom_id.as_deref());

    let response = client.get("/contacts", Some(query)).await?;
    Ok(params.window.apply(project_list(response, LIST_FIELDS)?))
}

async fn create_contact(client: Arc<dyn ApiClient>, params: NewContact) -> ToolResult<Value> {
    Ok(client.post("/contacts", Some(body_of(&params)?)).await?)
}

async fn get_contact(client: Arc<dyn ApiClient>, params: ContactRef) -> ToolResult<Value> {
    Ok(client.get(&params.path()?, None).await?)
}

async fn update_contact(client: Arc<dyn ApiClient>, params: UpdateContactParams) -> ToolResult<Value> {
    let path = format!("/contacts/{}", segment(&params.contact_id, "contactId")?);
    Ok(client.put(&path, Some(body_of(&params.changes)?)).await?)
}

async fn delete_contact(client: Arc<dyn ApiClient>, params: ContactRef) -> ToolResult<Value> {
    Ok(client.delete(&params.path()?).await?)
}

async fn list_contact_attachments(client: Arc<dyn ApiClient>, params: ContactRef) -> ToolResult<Value> {
    Ok(client
        .get(&format!("{}/attachments", params.path()?), None)
        .await?)
}

async fn get_contact_attachment(client: Arc<dyn ApiClient>, params: AttachmentRef) -> ToolResult<Value> {
    let path = format!(
        "/contacts/{}/attachments/{}",
        segment(&params.contact_id, "contactId")?,
        segment(&params.attachment_id, "attachmentId")?
    );
    Ok(client.get(&path, None).await?)
}

pub fn tools() -> Vec<ToolDefinition> {
    use ToolKind::{Destructive, ReadOnly};

    vec![
        ToolDefinition::new(
            "list_contacts",
            "List all contacts, optionally filtered by phone, mobile or custom IDs",
            ReadOnly,
            list_contacts,
        ),
        ToolDefinition::new("create_contact", "Create a new contact", Destructive, create_contact),
        ToolDefinition::new("get_contact", "Get a specific contact by ID", ReadOnly, get_contact),
        ToolDefinition::new("update_contact", "Update an existing contact", Destructive, update_contact),
        ToolDefinition::new("delete_contact", "Delete a contact", Destructive, delete_contact),
        ToolDefinition::new(
            "list_contact_attachments",
            "List the attachments of a contact",
            ReadOnly,
            list_contact_attachments,
        ),
        ToolDefinition::new(
            "get_contact_attachment",
            "Get a specific attachment of a contact",
            ReadOnly,
            get_contact_attachment,
        ),
    ]
}
