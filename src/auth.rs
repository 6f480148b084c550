//! Authentication: password hashing, session tokens, admin gate.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// The one email granted admin rights at registration time.
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@shop.com";

/// Session token lifetime.
const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Token claims: user identity plus the admin flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue_token(keys: &JwtKeys, user_id: Uuid, is_admin: bool) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        is_admin,
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    jsonwebtoken::encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|e| ApiError::Internal(e.into()))
}

pub fn decode_token(keys: &JwtKeys, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    jsonwebtoken::decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|data| data.claims)
}

pub fn is_bootstrap_admin(email: &str) -> bool {
    email == BOOTSTRAP_ADMIN_EMAIL
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// User record safe for handlers and responses (no password hash).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Extractor gating admin-only routes.
///
/// Missing token and invalid or expired tokens are unauthorized; a decoded
/// user that no longer exists is unauthorized; a live non-admin is forbidden.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized("No token provided"))?;

        let claims =
            decode_token(&state.jwt, token).map_err(|_| ApiError::Unauthorized("Invalid token"))?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, is_admin, created_at FROM users WHERE id = $1",
        )
        .bind(claims.sub)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::Unauthorized("User not found"))?;

        if !user.is_admin {
            return Err(ApiError::Forbidden("Admins only"));
        }

        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let keys = JwtKeys::new("test-secret");
        let user_id = Uuid::new_v4();
        let token = issue_token(&keys, user_id, true).unwrap();
        let claims = decode_token(&keys, &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_rejected() {
        let keys = JwtKeys::new("test-secret");
        let token = issue_token(&keys, Uuid::new_v4(), false).unwrap();
        let other = JwtKeys::new("other-secret");
        assert!(decode_token(&other, &token).is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let keys = JwtKeys::new("test-secret");
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            is_admin: false,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(decode_token(&keys, &token).is_err());
    }

    #[test]
    fn bootstrap_admin_is_exact_match() {
        assert!(is_bootstrap_admin("admin@shop.com"));
        assert!(!is_bootstrap_admin("user@shop.com"));
        assert!(!is_bootstrap_admin("Admin@shop.com"));
        assert!(!is_bootstrap_admin(""));
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("hunter2", "not-a-phc-string"));
    }
}
