//! Product catalog: public listing and lookup, admin-gated mutation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::types::Json as Jsonb;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub discount: i32,
    pub stock: i32,
    pub images: Vec<String>,
    pub variants: Jsonb<Vec<Variant>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Variant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

pub(crate) fn page_count(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ProductPage>, ApiError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(30).max(1);
    let offset = (page - 1) * limit;
    let pattern = params.search.as_deref().map(|s| format!("%{s}%"));

    let (products, total) = match &pattern {
        Some(pattern) => {
            let rows = sqlx::query_as::<_, Product>(
                "SELECT * FROM products WHERE name ILIKE $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            )
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.db)
            .await?;
            let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE name ILIKE $1")
                .bind(pattern)
                .fetch_one(&state.db)
                .await?;
            (rows, count.0)
        }
        None => {
            let rows = sqlx::query_as::<_, Product>(
                "SELECT * FROM products ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.db)
            .await?;
            let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
                .fetch_one(&state.db)
                .await?;
            (rows, count.0)
        }
    };

    Ok(Json(ProductPage {
        products,
        total,
        page,
        pages: page_count(total, limit),
    }))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Product not found"))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[validate(custom = "positive_price")]
    pub price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub discount: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
    #[validate(length(min = 1))]
    pub images: Vec<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

fn positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("price_not_positive"))
    }
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::invalid_payload("Invalid product data", e))?;

    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (id, name, brand, description, category, price, discount, stock, images, variants, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW())
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&payload.name)
    .bind(&payload.brand)
    .bind(&payload.description)
    .bind(&payload.category)
    .bind(payload.price)
    .bind(payload.discount)
    .bind(payload.stock)
    .bind(&payload.images)
    .bind(Jsonb(payload.variants.clone()))
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Partial update; unset fields keep their stored values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub discount: Option<i32>,
    pub stock: Option<i32>,
    pub images: Option<Vec<String>>,
    pub variants: Option<Vec<Variant>>,
}

impl ProductUpdate {
    /// The stored product with the incoming changes applied on top; the
    /// merged result is what gets validated, not the sparse patch.
    fn merged_onto(self, current: &Product) -> ProductPayload {
        ProductPayload {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            brand: self.brand.unwrap_or_else(|| current.brand.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            category: self.category.unwrap_or_else(|| current.category.clone()),
            price: self.price.unwrap_or(current.price),
            discount: self.discount.unwrap_or(current.discount),
            stock: self.stock.unwrap_or(current.stock),
            images: self.images.unwrap_or_else(|| current.images.clone()),
            variants: self.variants.unwrap_or_else(|| current.variants.0.clone()),
        }
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _admin: AdminUser,
    Json(patch): Json<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    let current = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Product not found"))?;

    let merged = patch.merged_onto(&current);
    merged
        .validate()
        .map_err(|e| ApiError::invalid_payload("Invalid update data", e))?;

    let updated = sqlx::query_as::<_, Product>(
        "UPDATE products
         SET name = $2, brand = $3, description = $4, category = $5, price = $6,
             discount = $7, stock = $8, images = $9, variants = $10, updated_at = NOW()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(&merged.name)
    .bind(&merged.brand)
    .bind(&merged.description)
    .bind(&merged.category)
    .bind(merged.price)
    .bind(merged.discount)
    .bind(merged.stock)
    .bind(&merged.images)
    .bind(Jsonb(merged.variants.clone()))
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _admin: AdminUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted: Option<(Uuid,)> = sqlx::query_as("DELETE FROM products WHERE id = $1 RETURNING id")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    if deleted.is_none() {
        return Err(ApiError::NotFound("Product not found"));
    }
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ProductPayload {
        ProductPayload {
            name: "Phone".into(),
            brand: "Acme".into(),
            description: String::new(),
            category: "electronics".into(),
            price: Decimal::new(499, 0),
            discount: 10,
            stock: 5,
            images: vec!["/phone.png".into()],
            variants: vec![],
        }
    }

    fn stored() -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Phone".into(),
            brand: "Acme".into(),
            description: "desc".into(),
            category: "electronics".into(),
            price: Decimal::new(499, 0),
            discount: 10,
            stock: 5,
            images: vec!["/phone.png".into()],
            variants: Jsonb(vec![Variant {
                size: None,
                color: Some("black".into()),
                storage: Some("128GB".into()),
            }]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(45, 30), 2);
        assert_eq!(page_count(60, 30), 2);
        assert_eq!(page_count(61, 30), 3);
        assert_eq!(page_count(0, 30), 0);
    }

    #[test]
    fn valid_payload_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn zero_price_rejected() {
        let mut p = payload();
        p.price = Decimal::ZERO;
        assert!(p.validate().is_err());
    }

    #[test]
    fn discount_over_100_rejected() {
        let mut p = payload();
        p.discount = 101;
        assert!(p.validate().is_err());
    }

    #[test]
    fn negative_stock_rejected() {
        let mut p = payload();
        p.stock = -1;
        assert!(p.validate().is_err());
    }

    #[test]
    fn empty_name_rejected() {
        let mut p = payload();
        p.name = String::new();
        assert!(p.validate().is_err());
    }

    #[test]
    fn missing_images_rejected() {
        let mut p = payload();
        p.images = vec![];
        assert!(p.validate().is_err());
    }

    #[test]
    fn partial_update_keeps_unset_fields() {
        let current = stored();
        let patch = ProductUpdate {
            price: Some(Decimal::new(399, 0)),
            ..Default::default()
        };
        let merged = patch.merged_onto(&current);
        assert_eq!(merged.price, Decimal::new(399, 0));
        assert_eq!(merged.name, current.name);
        assert_eq!(merged.variants.len(), 1);
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn update_is_validated_against_merged_result() {
        let current = stored();
        let patch = ProductUpdate {
            discount: Some(250),
            ..Default::default()
        };
        assert!(patch.merged_onto(&current).validate().is_err());
    }
}
