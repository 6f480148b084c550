//! Shared application state.

use crate::auth::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub jwt: JwtKeys,
    pub nats: Option<async_nats::Client>,
}
