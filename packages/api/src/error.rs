// ABOUTME: Application error type returned by all API handlers
// ABOUTME: Maps storage and auth failures onto HTTP statuses without leaking internals

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use schoolgate_auth::AuthError;
use schoolgate_core::FieldError;
use schoolgate_storage::StorageError;

/// Main application error type that all handlers should return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Wrap storage errors from the persistence layer
    #[error("Storage error")]
    Storage(#[from] StorageError),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Unauthorized(e.to_string())
    }
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    #[serde(rename = "requestId")]
    request_id: String,
}

/// Error detail structure with machine-readable codes
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl AppError {
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::Storage(storage_error) => match storage_error {
                StorageError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                StorageError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                StorageError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            },
        }
    }

    /// User-facing message; persistence detail stays server-side.
    fn to_user_message(&self) -> String {
        match self {
            AppError::Unauthorized(message) => message.clone(),
            AppError::Forbidden(message) => message.clone(),
            AppError::Storage(storage_error) => match storage_error {
                StorageError::Validation(fields) => {
                    format!("Validation failed: {} error(s)", fields.len())
                }
                StorageError::NotFound(resource) => format!("{} not found", resource),
                StorageError::Conflict(message) => message.clone(),
                _ => "Data storage error".to_string(),
            },
        }
    }

    fn fields(&self) -> Option<Vec<FieldError>> {
        match self {
            AppError::Storage(StorageError::Validation(fields)) => Some(fields.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.to_status_and_code();
        let request_id = format!("req-{}", nanoid::nanoid!(10));

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(request_id = %request_id, "Internal error: {:?}", self);
        }

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_user_message(),
                fields: self.fields(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}
