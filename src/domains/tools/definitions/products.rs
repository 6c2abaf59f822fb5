//! Products, their images and stock.

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;

use super::common::{body_of, segment};
use crate::core::client::{ApiClient, QueryParams};
use crate::domains::tools::{ToolDefinition, ToolKind, ToolResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Product,
    Service,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListProductsParams {
    #[schemars(description = "Page number for pagination (optional)")]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[schemars(description = "Product name")]
    pub name: String,

    #[schemars(description = "Product description")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[schemars(description = "Stock keeping unit")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    #[schemars(description = "Product barcode")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    #[schemars(description = "Sale price")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[schemars(description = "Cost price")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,

    #[schemars(description = "Tax percentage")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,

    #[schemars(description = "Initial stock")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<f64>,

    #[schemars(description = "Product kind")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ProductKind>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    #[schemars(description = "Product ID")]
    pub product_id: String,
}

impl ProductRef {
    fn path(&self) -> ToolResult<String> {
        product_path(&self.product_id)
    }
}

fn product_path(product_id: &str) -> ToolResult<String> {
    Ok(format!("/products/{}", segment(product_id, "productId")?))
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductParams {
    #[schemars(description = "Product ID to update")]
    pub product_id: String,

    #[serde(flatten)]
    pub changes: ProductChanges,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    #[schemars(description = "Product ID")]
    pub product_id: String,

    #[schemars(description = "Image ID")]
    pub image_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockParams {
    #[schemars(description = "Product ID")]
    pub product_id: String,

    #[schemars(description = "Warehouse ID (optional, uses the default warehouse otherwise)")]
    pub warehouse_id: Option<String>,

    #[schemars(description = "Units to add (negative to remove)")]
    pub units: f64,
}

async fn list_products(client: Arc<dyn ApiClient>, params: ListProductsParams) -> ToolResult<Value> {
    let mut query = QueryParams::new();
    query.push_opt("page", params.page.filter(|p| *p > 0));
    Ok(client.get("/products", Some(query)).await?)
}

async fn create_product(client: Arc<dyn ApiClient>, params: NewProduct) -> ToolResult<Value> {
    Ok(client.post("/products", Some(body_of(&params)?)).await?)
}

async fn get_product(client: Arc<dyn ApiClient>, params: ProductRef) -> ToolResult<Value> {
    Ok(client.get(&params.path()?, None).await?)
}

async fn update_product(client: Arc<dyn ApiClient>, params: UpdateProductParams) -> ToolResult<Value> {
    let path = product_path(&params.product_id)?;
    Ok(client.put(&path, Some(body_of(&params.changes)?)).await?)
}

async fn delete_product(client: Arc<dyn ApiClient>, params: ProductRef) -> ToolResult<Value> {
    Ok(client.delete(&params.path()?).await?)
}

async fn get_product_main_image(client: Arc<dyn ApiClient>, params: ProductRef) -> ToolResult<Value> {
    Ok(client.get(&format!("{}/image", params.path()?), None).await?)
}

async fn list_product_images(client: Arc<dyn ApiClient>, params: ProductRef) -> ToolResult<Value> {
    Ok(client.get(&format!("{}/images", params.path()?), None).await?)
}

async fn get_product_secondary_image(client: Arc<dyn ApiClient>, params: ImageRef) -> ToolResult<Value> {
    let path = format!(
        "{}/images/{}",
        product_path(&params.product_id)?,
        segment(&params.image_id, "imageId")?
    );
    Ok(client.get(&path, None).await?)
}

async fn update_product_stock(client: Arc<dyn ApiClient>, params: UpdateStockParams) -> ToolResult<Value> {
    let mut body = Map::new();
    body.insert("units".into(), json!(params.units));
    if let Some(warehouse_id) = params.warehouse_id.filter(|w| !w.is_empty()) {
        body.insert("warehouseId".into(), json!(warehouse_id));
    }
    let path = format!("{}/stock", product_path(&params.product_id)?);
    Ok(client.put(&path, Some(Value::Object(body))).await?)
}

pub fn tools() -> Vec<ToolDefinition> {
    use ToolKind::{Destructive, ReadOnly};

    vec![
        ToolDefinition::new("list_products", "List all products", ReadOnly, list_products),
        ToolDefinition::new("create_product", "Create a new product", Destructive, create_product),
        ToolDefinition::new("get_product", "Get a specific product by ID", ReadOnly, get_product),
        ToolDefinition::new("update_product", "Update an existing product", Destructive, update_product),
        ToolDefinition::new("delete_product", "Delete a product", Destructive, delete_product),
        ToolDefinition::new(
            "get_product_main_image",
            "Get the main image of a product",
            ReadOnly,
            get_product_main_image,
        ),
        ToolDefinition::new(
            "list_product_images",
            "List all images of a product",
            ReadOnly,
            list_product_images,
        ),
        ToolDefinition::new(
            "get_product_secondary_image",
            "Get a secondary image of a product",
            ReadOnly,
            get_product_secondary_image,
        ),
        ToolDefinition::new(
            "update_product_stock",
            "Update the stock of a product, optionally in a specific warehouse",
            Destructive,
            update_product_stock,
        ),
    ]
}
