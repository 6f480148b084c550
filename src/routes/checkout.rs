//! Checkout flow: cart snapshot in, persisted order and receipt out.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::events::{self, OrderPlaced};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub cart_items: Vec<CheckoutItem>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub qty: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub success: bool,
    pub message: &'static str,
    pub order_id: Uuid,
    pub total: Decimal,
    pub customer: Customer,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
}

fn validate(req: &CheckoutRequest) -> Result<(), ApiError> {
    if req.cart_items.is_empty() {
        return Err(ApiError::validation("Cart is empty"));
    }
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(ApiError::validation("Name and email are required"));
    }
    Ok(())
}

/// Total over the submitted snapshot. Prices come from the client, not the
/// catalog; the stored order reflects what was submitted.
pub(crate) fn order_total(items: &[CheckoutItem]) -> Decimal {
    items.iter().map(|i| i.price * Decimal::from(i.qty)).sum()
}

/// Remaining stock after a line is taken, or `None` when the line cannot be
/// satisfied and its decrement must be skipped.
pub(crate) fn stock_after(stock: i32, qty: u32) -> Option<i32> {
    let qty = i32::try_from(qty).ok()?;
    if stock >= qty {
        Some(stock - qty)
    } else {
        None
    }
}

pub async fn checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<Receipt>, ApiError> {
    validate(&req)?;
    let total = order_total(&req.cart_items);

    // Best-effort decrement: one independent read-then-write per line, no
    // transaction. A line with too little stock is skipped without failing
    // the order, and earlier decrements stay in place. Concurrent checkouts
    // can both pass the read before either writes; oversell is accepted.
    for item in &req.cart_items {
        let current: Option<(i32,)> = sqlx::query_as("SELECT stock FROM products WHERE id = $1")
            .bind(item.id)
            .fetch_optional(&state.db)
            .await?;
        let Some((stock,)) = current else { continue };
        if let Some(remaining) = stock_after(stock, item.qty) {
            sqlx::query("UPDATE products SET stock = $2, updated_at = NOW() WHERE id = $1")
                .bind(item.id)
                .bind(remaining)
                .execute(&state.db)
                .await?;
        }
    }

    let order_id = Uuid::now_v7();
    sqlx::query(
        "INSERT INTO orders (id, customer_name, customer_email, total, created_at)
         VALUES ($1, $2, $3, $4, NOW())",
    )
    .bind(order_id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(total)
    .execute(&state.db)
    .await?;

    for item in &req.cart_items {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, product_id, name, price, qty)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::now_v7())
        .bind(order_id)
        .bind(item.id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.qty as i32)
        .execute(&state.db)
        .await?;
    }

    events::publish_order_placed(
        &state.nats,
        &OrderPlaced {
            order_id,
            customer_email: req.email.clone(),
            total,
        },
    )
    .await;

    Ok(Json(Receipt {
        success: true,
        message: "Checkout successful",
        order_id,
        total,
        customer: Customer {
            name: req.name,
            email: req.email,
        },
        timestamp: Utc::now(),
    }))
}
