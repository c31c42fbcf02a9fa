//! API error type with IntoResponse
//!
//! Errors become `{ "error": <code>, "message": <text> }` with a matching
//! status code. Driver constraint messages pass through unchanged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dailykit_core::ValidationError;
use serde_json::json;
use sqlx::error::ErrorKind;

use crate::db::DbError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Input failed schema validation (400)
    Validation(ValidationError),

    /// Body was not the JSON the procedure expects (400)
    BadRequest { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Domain rule refused the operation, e.g. a guarded delete (409)
    Conflict { message: String },

    /// Unique, foreign-key, check or not-null violation (409)
    Constraint { message: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    fn status_and_body(&self) -> (StatusCode, serde_json::Value) {
        match self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "bad_request",
                    "message": message
                }),
            ),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", resource, id)
                }),
            ),
            Self::Conflict { message } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "conflict",
                    "message": message
                }),
            ),
            Self::Constraint { message } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "constraint_violation",
                    "message": message
                }),
            ),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::HasDependents { .. } => Self::Conflict {
                message: e.to_string(),
            },
            DbError::Sqlx(sqlx::Error::Database(db)) if db.kind() != ErrorKind::Other => {
                Self::Constraint {
                    message: db.message().to_owned(),
                }
            }
            other => Self::Database(other),
        }
    }
}
