//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": msg }))).into_response()
            }
            // Validation failures report a field -> message mapping.
            ApiError::Validation { field, message } => {
                let mut body = serde_json::Map::new();
                body.insert(field, serde_json::Value::String(message));
                (StatusCode::BAD_REQUEST, Json(serde_json::Value::Object(body))).into_response()
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "detail": msg }))).into_response()
            }
            ApiError::Database(e) => {
                tracing::error!("database error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(what: &str, id: i32) -> ApiError {
        ApiError::NotFound(format!("{} {} not found", what, id))
    }

    /// Remaps a foreign-key violation to a validation failure naming the
    /// referenced resource. Used by the commit path, where a dangling survey,
    /// customer, or question reference is a client error, not a server one.
    pub fn from_commit_failure(e: anyhow::Error) -> ApiError {
        if let Some(db_err) = e
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
        {
            if db_err.is_foreign_key_violation() {
                let field = match db_err.constraint() {
                    Some(c) if c.contains("question") => "question",
                    Some(c) if c.contains("customer") => "customer",
                    Some(c) if c.contains("survey") => "survey",
                    _ => "given_answers",
                };
                return ApiError::Validation {
                    field: field.to_owned(),
                    message: format!("The referenced {} does not exist", field),
                };
            }
        }

        ApiError::Database(e)
    }
}
