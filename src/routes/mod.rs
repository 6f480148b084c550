//! HTTP surface.

pub mod admin;
pub mod checkout;
pub mod products;
pub mod reviews;
pub mod users;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/checkout", post(checkout::checkout))
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route(
            "/reviews/:product_id",
            get(reviews::list).post(reviews::create),
        )
        .route("/admin", get(admin::probe))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "service": "storefront" }))
}
