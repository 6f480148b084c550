//! Admin gate probe.

use axum::Json;
use serde_json::{json, Value};

use crate::auth::AdminUser;

/// Succeeding here at all means the caller holds a valid admin token; the
/// admin UI calls this on mount before showing anything.
pub async fn probe(AdminUser(user): AdminUser) -> Json<Value> {
    Json(json!({ "message": format!("Welcome {}", user.name) }))
}
