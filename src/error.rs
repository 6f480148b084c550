//! Request error taxonomy and its HTTP mapping.
//!
//! Handlers return `Result<_, ApiError>`; the boundary maps every variant to
//! a status code and a `{message, error?}` JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        detail: Option<String>,
    },

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            detail: None,
        }
    }

    /// Schema validation failure: fixed message plus the validator detail.
    pub fn invalid_payload(message: &'static str, errors: validator::ValidationErrors) -> Self {
        Self::Validation {
            message: message.to_string(),
            detail: Some(errors.to_string()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation { message, detail } => (
                StatusCode::BAD_REQUEST,
                match detail {
                    Some(d) => json!({ "message": message, "error": d }),
                    None => json!({ "message": message }),
                },
            ),
            Self::Conflict(m) => (StatusCode::BAD_REQUEST, json!({ "message": m })),
            Self::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "message": m })),
            Self::Unauthorized(m) => (StatusCode::UNAUTHORIZED, json!({ "message": m })),
            Self::Forbidden(m) => (StatusCode::FORBIDDEN, json!({ "message": m })),
            Self::Internal(e) => {
                tracing::error!("request failed: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Server error", "error": e.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
