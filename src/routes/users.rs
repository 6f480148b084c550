//! Registration and login.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: &'static str,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub is_admin: bool,
    pub name: String,
    pub email: String,
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    is_admin: bool,
}

fn invalid_credentials() -> ApiError {
    ApiError::validation("Invalid credentials")
}

/// Unknown email and wrong password share one outcome so the endpoint cannot
/// be used to probe which addresses are registered.
fn verify_login(row: Option<CredentialRow>, password: &str) -> Result<CredentialRow, ApiError> {
    let Some(user) = row else {
        return Err(invalid_credentials());
    };
    if !auth::verify_password(password, &user.password_hash) {
        return Err(invalid_credentials());
    }
    Ok(user)
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::validation("Name, email and password are required"));
    }

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email already exists"));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let is_admin = auth::is_bootstrap_admin(&req.email);

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, is_admin, created_at)
         VALUES ($1, $2, $3, $4, $5, NOW())",
    )
    .bind(Uuid::now_v7())
    .bind(&req.name)
    .bind(&req.email)
    .bind(&password_hash)
    .bind(is_admin)
    .execute(&state.db)
    .await?;

    Ok(Json(RegisterResponse {
        message: "User registered successfully",
        is_admin,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let row = sqlx::query_as::<_, CredentialRow>(
        "SELECT id, name, email, password_hash, is_admin FROM users WHERE email = $1",
    )
    .bind(&req.email)
    .fetch_optional(&state.db)
    .await?;

    let user = verify_login(row, &req.password)?;
    let token = auth::issue_token(&state.jwt, user.id, user.is_admin)?;

    Ok(Json(LoginResponse {
        token,
        is_admin: user.is_admin,
        name: user.name,
        email: user.email,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(password: &str) -> CredentialRow {
        CredentialRow {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            email: "alice@x.com".into(),
            password_hash: auth::hash_password(password).unwrap(),
            is_admin: false,
        }
    }

    #[test]
    fn unknown_email_and_wrong_password_share_one_message() {
        let unknown = verify_login(None, "whatever").unwrap_err();
        let wrong = verify_login(Some(row("correct")), "incorrect").unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.to_string(), "Invalid credentials");
    }

    #[test]
    fn correct_password_logs_in() {
        let user = verify_login(Some(row("correct")), "correct").unwrap();
        assert_eq!(user.email, "alice@x.com");
    }
}
