//! Sales and purchase documents: invoices, estimates, orders, waybills...
//!
//! Every document operation is addressed by a [`DocType`] and, except for
//! listing and creation, a document id.

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::common::{
    NoParams, WindowArgs, body_of, decode_base64, project, push_date_range, segment,
};
use crate::core::client::{ApiClient, QueryParams};
use crate::domains::tools::{ToolDefinition, ToolKind, ToolResult};

/// Fields kept by `list_documents`.
const LIST_FIELDS: &[&str] = &["id", "contact", "contactName", "date", "tax", "total", "status"];

/// Kind of document, as named in API paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Invoice,
    SalesReceipt,
    CreditNote,
    ReceiptNote,
    Estimate,
    SalesOrder,
    Waybill,
    Proform,
    Purchase,
    PurchaseRefund,
    PurchaseOrder,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::SalesReceipt => "salesreceipt",
            Self::CreditNote => "creditnote",
            Self::ReceiptNote => "receiptnote",
            Self::Estimate => "estimate",
            Self::SalesOrder => "salesorder",
            Self::Waybill => "waybill",
            Self::Proform => "proform",
            Self::Purchase => "purchase",
            Self::PurchaseRefund => "purchaserefund",
            Self::PurchaseOrder => "purchaseorder",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
pub enum PaidFilter {
    #[serde(rename = "0")]
    NotPaid,
    #[serde(rename = "1")]
    Paid,
    #[serde(rename = "2")]
    PartiallyPaid,
}

impl PaidFilter {
    fn as_str(&self) -> &'static str {
        match self {
            Self::NotPaid => "0",
            Self::Paid => "1",
            Self::PartiallyPaid => "2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
pub enum BilledFilter {
    #[serde(rename = "0")]
    NotBilled,
    #[serde(rename = "1")]
    Billed,
}

impl BilledFilter {
    fn as_str(&self) -> &'static str {
        match self {
            Self::NotBilled => "0",
            Self::Billed => "1",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
pub enum SortOrder {
    #[serde(rename = "created-asc")]
    CreatedAsc,
    #[serde(rename = "created-desc")]
    CreatedDesc,
}

impl SortOrder {
    fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAsc => "created-asc",
            Self::CreatedDesc => "created-desc",
        }
    }
}

/// A single existing document.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    #[schemars(description = "Type of document")]
    pub doc_type: DocType,

    #[schemars(description = "Document ID")]
    pub document_id: String,
}

impl DocumentRef {
    fn path(&self) -> ToolResult<String> {
        let id = segment(&self.document_id, "documentId")?;
        Ok(format!("/documents/{}/{id}", self.doc_type))
    }

    fn action_path(&self, action: &str) -> ToolResult<String> {
        Ok(format!("{}/{action}", self.path()?))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListDocumentsParams {
    #[serde(rename = "docType")]
    #[schemars(description = "Type of document to list")]
    pub doc_type: DocType,

    #[serde(flatten)]
    pub window: WindowArgs,

    #[schemars(description = "Starting timestamp (Unix timestamp) for filtering documents by date")]
    pub starttmp: Option<String>,

    #[schemars(description = "Ending timestamp (Unix timestamp) for filtering documents by date")]
    pub endtmp: Option<String>,

    #[schemars(description = "Filter documents by contact ID")]
    pub contactid: Option<String>,

    #[schemars(description = "Filter by payment status: 0=not paid, 1=paid, 2=partially paid")]
    pub paid: Option<PaidFilter>,

    #[schemars(description = "Filter by billed status: 0=not billed, 1=billed")]
    pub billed: Option<BilledFilter>,

    #[schemars(description = "Sort order by creation date")]
    pub sort: Option<SortOrder>,
}

/// One line of a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DocumentLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,

    /// Other line fields accepted by the API.
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Body of a new document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    #[schemars(description = "Contact ID for the document")]
    pub contact_id: String,

    #[schemars(description = "Array of line items")]
    pub items: Vec<DocumentLine>,

    #[schemars(description = "Document date as Unix timestamp")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,

    #[schemars(description = "Notes for the document")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[schemars(description = "Currency code (e.g., EUR, USD)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Other document fields accepted by the API.
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateDocumentParams {
    #[serde(rename = "docType")]
    #[schemars(description = "Type of document to create")]
    pub doc_type: DocType,

    #[serde(flatten)]
    pub document: NewDocument,
}

/// Fields changed by `update_document`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChanges {
    #[schemars(description = "Contact ID for the document")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,

    #[schemars(description = "Array of line items")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<DocumentLine>>,

    #[schemars(description = "Document date as Unix timestamp")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,

    #[schemars(description = "Notes for the document")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateDocumentParams {
    #[serde(flatten)]
    pub target: DocumentRef,

    #[serde(flatten)]
    pub changes: DocumentChanges,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[schemars(description = "Payment date as Unix timestamp")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,

    #[schemars(description = "Payment amount")]
    pub amount: f64,

    #[schemars(description = "Treasury account ID")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treasury_id: Option<String>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PayDocumentParams {
    #[serde(flatten)]
    pub target: DocumentRef,

    #[serde(flatten)]
    pub payment: Payment,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Email {
    #[schemars(description = "Array of email addresses to send to")]
    pub emails: Vec<String>,

    #[schemars(description = "Email subject")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[schemars(description = "Email message body")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SendDocumentParams {
    #[serde(flatten)]
    pub target: DocumentRef,

    #[serde(flatten)]
    pub email: Email,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<f64>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ShipItemsParams {
    #[serde(flatten)]
    pub target: DocumentRef,

    #[schemars(description = "Array of line items to ship")]
    pub lines: Vec<ShipLine>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachFileParams {
    #[serde(flatten)]
    pub target: DocumentRef,

    #[schemars(description = "File content as base64 encoded string")]
    pub file_base64: String,

    #[schemars(description = "Name of the file")]
    pub filename: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tracking {
    #[schemars(description = "Tracking number")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,

    #[schemars(description = "Carrier name")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateTrackingParams {
    #[serde(flatten)]
    pub target: DocumentRef,

    #[serde(flatten)]
    pub tracking: Tracking,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePipelineParams {
    #[serde(flatten)]
    pub target: DocumentRef,

    #[schemars(description = "Pipeline ID")]
    pub pipeline_id: String,

    #[schemars(description = "Stage ID within the pipeline")]
    pub stage_id: String,
}

#[instrument(skip_all, fields(doc_type = %params.doc_type))]
async fn list_documents(client: Arc<dyn ApiClient>, params: ListDocumentsParams) -> ToolResult<Value> {
    let mut query = QueryParams::new();
    params.window.push_query(&mut query);
    push_date_range(
        &mut query,
        params.starttmp.as_deref(),
        params.endtmp.as_deref(),
    );
    query
        .push_opt("contactid", params.contactid.as_deref().filter(|s| !s.is_empty()))
        .push_opt("paid", params.paid.map(|p| p.as_str()))
        .push_opt("billed", params.billed.map(|b| b.as_str()))
        .push_opt("sort", params.sort.map(|s| s.as_str()));

    let response = client
        .get(&format!("/documents/{}", params.doc_type), Some(query))
        .await?;

    // Anything but a list is handed back untouched.
    match response {
        Value::Array(records) => {
            debug!(count = records.len(), "Listed documents");
            let projected = records.iter().map(|r| project(r, LIST_FIELDS)).collect();
            Ok(params.window.apply(projected))
        }
        other => Ok(other),
    }
}

async fn create_document(client: Arc<dyn ApiClient>, params: CreateDocumentParams) -> ToolResult<Value> {
    let body = body_of(&params.document)?;
    Ok(client
        .post(&format!("/documents/{}", params.doc_type), Some(body))
        .await?)
}

async fn get_document(client: Arc<dyn ApiClient>, params: DocumentRef) -> ToolResult<Value> {
    Ok(client.get(&params.path()?, None).await?)
}

async fn update_document(client: Arc<dyn ApiClient>, params: UpdateDocumentParams) -> ToolResult<Value> {
    let body = body_of(&params.changes)?;
    Ok(client.put(&params.target.path()?, Some(body)).await?)
}

async fn delete_document(client: Arc<dyn ApiClient>, params: DocumentRef) -> ToolResult<Value> {
    Ok(client.delete(&params.path()?).await?)
}

async fn pay_document(client: Arc<dyn ApiClient>, params: PayDocumentParams) -> ToolResult<Value> {
    let body = body_of(&params.payment)?;
    Ok(client
        .post(&params.target.action_path("pay")?, Some(body))
        .await?)
}

async fn send_document(client: Arc<dyn ApiClient>, params: SendDocumentParams) -> ToolResult<Value> {
    let body = body_of(&params.email)?;
    Ok(client
        .post(&params.target.action_path("send")?, Some(body))
        .await?)
}

async fn get_document_pdf(client: Arc<dyn ApiClient>, params: DocumentRef) -> ToolResult<Value> {
    Ok(client.get(&params.action_path("pdf")?, None).await?)
}

async fn ship_all_items(client: Arc<dyn ApiClient>, params: DocumentRef) -> ToolResult<Value> {
    Ok(client.post(&params.action_path("ship")?, None).await?)
}

async fn ship_items_by_line(client: Arc<dyn ApiClient>, params: ShipItemsParams) -> ToolResult<Value> {
    let body = json!({ "lines": body_of(&params.lines)? });
    Ok(client
        .post(&params.target.action_path("ship")?, Some(body))
        .await?)
}

async fn get_shipped_units(client: Arc<dyn ApiClient>, params: DocumentRef) -> ToolResult<Value> {
    Ok(client.get(&params.action_path("shipped")?, None).await?)
}

#[instrument(skip_all, fields(filename = %params.filename))]
async fn attach_file_to_document(
    client: Arc<dyn ApiClient>,
    params: AttachFileParams,
) -> ToolResult<Value> {
    let file = decode_base64(&params.file_base64, "fileBase64")?;
    debug!(bytes = file.len(), "Uploading attachment");
    Ok(client
        .upload_file(&params.target.action_path("attach")?, file, &params.filename)
        .await?)
}

async fn update_document_tracking(
    client: Arc<dyn ApiClient>,
    params: UpdateTrackingParams,
) -> ToolResult<Value> {
    let body = body_of(&params.tracking)?;
    Ok(client
        .post(&params.target.action_path("tracking")?, Some(body))
        .await?)
}

async fn update_document_pipeline(
    client: Arc<dyn ApiClient>,
    params: UpdatePipelineParams,
) -> ToolResult<Value> {
    let body = json!({ "pipelineId": params.pipeline_id, "stageId": params.stage_id });
    Ok(client
        .post(&params.target.action_path("pipeline")?, Some(body))
        .await?)
}

async fn list_payment_methods(client: Arc<dyn ApiClient>, _params: NoParams) -> ToolResult<Value> {
    Ok(client.get("/paymentmethods", None).await?)
}

pub fn tools() -> Vec<ToolDefinition> {
    use ToolKind::{Destructive, ReadOnly};

    vec![
        ToolDefinition::new(
            "list_documents",
            "List all documents of a specific type with optional filters for date range, contact, payment status, and sorting",
            ReadOnly,
            list_documents,
        ),
        ToolDefinition::new(
            "create_document",
            "Create a new document (invoice, estimate, etc.)",
            Destructive,
            create_document,
        ),
        ToolDefinition::new("get_document", "Get a specific document by ID", ReadOnly, get_document),
        ToolDefinition::new("update_document", "Update an existing document", Destructive, update_document),
        ToolDefinition::new("delete_document", "Delete a document", Destructive, delete_document),
        ToolDefinition::new("pay_document", "Register a payment for a document", Destructive, pay_document),
        ToolDefinition::new("send_document", "Send a document by email", Destructive, send_document),
        ToolDefinition::new("get_document_pdf", "Get the PDF of a document", ReadOnly, get_document_pdf),
        ToolDefinition::new("ship_all_items", "Ship all items of a document", Destructive, ship_all_items),
        ToolDefinition::new(
            "ship_items_by_line",
            "Ship specific items by line",
            Destructive,
            ship_items_by_line,
        ),
        ToolDefinition::new(
            "get_shipped_units",
            "Get shipped units by item for a document",
            ReadOnly,
            get_shipped_units,
        ),
        ToolDefinition::new(
            "attach_file_to_document",
            "Attach a file to a document",
            Destructive,
            attach_file_to_document,
        ),
        ToolDefinition::new(
            "update_document_tracking",
            "Update tracking information for a document",
            Destructive,
            update_document_tracking,
        ),
        ToolDefinition::new(
            "update_document_pipeline",
            "Update pipeline stage for a document",
            Destructive,
            update_document_pipeline,
        ),
        ToolDefinition::new(
            "list_payment_methods",
            "List available payment methods",
            ReadOnly,
            list_payment_methods,
        ),
    ]
}
