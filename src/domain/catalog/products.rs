//! Product catalog: admin CRUD over the `products` table plus filtered browsing. Changes need an
//! admin `user-id` header.

use anyhow::Context;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use jiff_sqlx::ToSqlx;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::{ProductId, users::require_admin},
    infra::ClientError,
};

use super::{CatalogError, ProductFilter, ProductFilterParams};

//------------------------- Web API ----------------------------

pub async fn list_products_endpoint(
    State(pool): State<PgPool>,
    Query(params): Query<ProductFilterParams>,
) -> Result<Json<Vec<Product>>, ClientError> {
    let filter: ProductFilter = params.try_into()?;
    let products = all_products(&pool)
        .await?
        .into_iter()
        .filter(|product| filter.matches(product))
        .collect();
    Ok(Json(products))
}

pub async fn product_endpoint(
    State(pool): State<PgPool>,
    Path(product_uuid): Path<Uuid>,
) -> Result<Json<Product>, ClientError> {
    let product_id: ProductId = product_uuid.try_into()?;
    let product = find_product(&pool, &product_id)
        .await?
        .ok_or(CatalogError::ProductNotFound(product_id))?;
    Ok(Json(product))
}

pub async fn create_product_endpoint(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, ClientError> {
    require_admin(&pool, &headers).await?;
    payload.validate()?;
    let product = insert_product(&pool, &ProductId::new(), &payload).await?;
    info!("Product {} ({}) created.", product.name, product.product_id);
    Ok(Json(product))
}

pub async fn update_product_endpoint(
    State(pool): State<PgPool>,
    Path(product_uuid): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, ClientError> {
    require_admin(&pool, &headers).await?;
    let product_id: ProductId = product_uuid.try_into()?;
    payload.validate()?;
    let product = update_product(&pool, &product_id, &payload)
        .await?
        .ok_or(CatalogError::ProductNotFound(product_id))?;
    info!("Product {product_id} updated.");
    Ok(Json(product))
}

#[derive(Debug, serde::Serialize)]
pub struct DeleteResponse {
    success: bool,
}

pub async fn delete_product_endpoint(
    State(pool): State<PgPool>,
    Path(product_uuid): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<DeleteResponse>, ClientError> {
    require_admin(&pool, &headers).await?;
    let product_id: ProductId = product_uuid.try_into()?;
    if !delete_product(&pool, &product_id).await? {
        return Err(CatalogError::ProductNotFound(product_id).into());
    }
    info!("Product {product_id} deleted.");
    Ok(Json(DeleteResponse { success: true }))
}

//------------------------- Model ------------------------------

/// Highest unit price a product can be listed or carted at.
pub const MAX_PRICE: Decimal = Decimal::from_parts(
    (1_000_000_u64 & 0xFFFF_FFFF) as u32,
    (1_000_000_u64 >> 32) as u32,
    0,
    false,
    0,
);

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub name: String,
    pub brand: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub images: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub style: String,
    pub category: String,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPayload {
    pub name: String,
    pub brand: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub images: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub style: String,
    pub category: String,
}

impl ProductPayload {
    fn validate(&self) -> Result<(), CatalogError> {
        let blank = [
            ("name", &self.name),
            ("brand", &self.brand),
            ("description", &self.description),
            ("style", &self.style),
            ("category", &self.category),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        if let Some((field, _)) = blank {
            return Err(CatalogError::MissingField(field));
        }
        if self.price.is_sign_negative() {
            return Err(CatalogError::NegativePrice);
        }
        if self.price > MAX_PRICE {
            return Err(CatalogError::PriceTooHigh);
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow, Debug)]
struct ProductRow {
    product_id: ProductId,
    name: String,
    brand: String,
    description: String,
    price: Decimal,
    images: Vec<String>,
    sizes: Vec<String>,
    colors: Vec<String>,
    style: String,
    category: String,
    created_at: jiff_sqlx::Timestamp,
    updated_at: jiff_sqlx::Timestamp,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            product_id: row.product_id,
            name: row.name,
            brand: row.brand,
            description: row.description,
            price: row.price,
            images: row.images,
            sizes: row.sizes,
            colors: row.colors,
            style: row.style,
            category: row.category,
            created_at: row.created_at.to_jiff(),
            updated_at: row.updated_at.to_jiff(),
        }
    }
}

//--------------------------- SQL -------------------------------

const PRODUCT_COLUMNS: &str =
    "product_id, name, brand, description, price, images, sizes, colors, style, category, created_at, updated_at";

/// Every product, newest first.
pub async fn all_products(pool: &PgPool) -> Result<Vec<Product>, anyhow::Error> {
    let rows: Vec<ProductRow> = sqlx::query_as(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, product_id DESC"
    ))
    .fetch_all(pool)
    .await
    .context("Problem in all_products.")?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn find_product(
    pool: &PgPool,
    product_id: &ProductId,
) -> Result<Option<Product>, anyhow::Error> {
    let row: Option<ProductRow> = sqlx::query_as(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1"
    ))
    .bind(product_id)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Problem in find_product({product_id})."))?;

    Ok(row.map(Into::into))
}

pub async fn insert_product(
    pool: &PgPool,
    product_id: &ProductId,
    payload: &ProductPayload,
) -> Result<Product, anyhow::Error> {
    let now = jiff::Timestamp::now().to_sqlx();
    let row: ProductRow = sqlx::query_as(&format!(
        r#"INSERT INTO products
           (product_id, name, brand, description, price, images, sizes, colors, style, category, created_at, updated_at)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
           RETURNING {PRODUCT_COLUMNS}"#
    ))
    .bind(product_id)
    .bind(&payload.name)
    .bind(&payload.brand)
    .bind(&payload.description)
    .bind(payload.price)
    .bind(&payload.images)
    .bind(&payload.sizes)
    .bind(&payload.colors)
    .bind(&payload.style)
    .bind(&payload.category)
    .bind(now)
    .fetch_one(pool)
    .await
    .with_context(|| format!("Problem in insert_product({product_id})."))?;

    Ok(row.into())
}

/// Replaces every editable field. `None` when the product does not exist.
pub async fn update_product(
    pool: &PgPool,
    product_id: &ProductId,
    payload: &ProductPayload,
) -> Result<Option<Product>, anyhow::Error> {
    let now = jiff::Timestamp::now().to_sqlx();
    let row: Option<ProductRow> = sqlx::query_as(&format!(
        r#"UPDATE products
           SET name = $2, brand = $3, description = $4, price = $5, images = $6, sizes = $7,
               colors = $8, style = $9, category = $10, updated_at = $11
           WHERE product_id = $1
           RETURNING {PRODUCT_COLUMNS}"#
    ))
    .bind(product_id)
    .bind(&payload.name)
    .bind(&payload.brand)
    .bind(&payload.description)
    .bind(payload.price)
    .bind(&payload.images)
    .bind(&payload.sizes)
    .bind(&payload.colors)
    .bind(&payload.style)
    .bind(&payload.category)
    .bind(now)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Problem in update_product({product_id})."))?;

    Ok(row.map(Into::into))
}

/// `true` if a product was deleted.
pub async fn delete_product(pool: &PgPool, product_id: &ProductId) -> Result<bool, anyhow::Error> {
    let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
        .bind(product_id)
        .execute(pool)
        .await
        .with_context(|| format!("Problem in delete_product({product_id})."))?;

    Ok(result.rows_affected() > 0)
}

//-------------------------- Tests -------------------------------
