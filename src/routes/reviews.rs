//! Per-product reviews.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub rating: i32,
    pub comment: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1))]
    pub comment: String,
}

async fn ensure_product_exists(state: &AppState, product_id: Uuid) -> Result<(), ApiError> {
    let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&state.db)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(ApiError::NotFound("Product not found")),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Vec<Review>>, ApiError> {
    ensure_product_exists(&state, product_id).await?;
    let reviews = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE product_id = $1 ORDER BY created_at DESC",
    )
    .bind(product_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(reviews))
}

pub async fn create(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<ReviewPayload>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::invalid_payload("Invalid review data", e))?;
    ensure_product_exists(&state, product_id).await?;

    let review = sqlx::query_as::<_, Review>(
        "INSERT INTO reviews (id, product_id, name, rating, comment, created_at)
         VALUES ($1, $2, $3, $4, $5, NOW())
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(product_id)
    .bind(&payload.name)
    .bind(payload.rating)
    .bind(&payload.comment)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(rating: i32) -> ReviewPayload {
        ReviewPayload {
            name: "Alice".into(),
            rating,
            comment: "Solid".into(),
        }
    }

    #[test]
    fn rating_must_be_one_to_five() {
        assert!(payload(1).validate().is_ok());
        assert!(payload(5).validate().is_ok());
        assert!(payload(0).validate().is_err());
        assert!(payload(6).validate().is_err());
    }

    #[test]
    fn empty_comment_rejected() {
        let mut p = payload(4);
        p.comment = String::new();
        assert!(p.validate().is_err());
    }
}
