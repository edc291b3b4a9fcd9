//! Error handling for the Sapi Seto back office
//!
//! Provides consistent error responses in English and Indonesian

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::types::{FieldErrors, IdError};
use thiserror::Error;

/// SQLSTATE raised by Postgres when a row is still referenced
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, errors: FieldErrors },

    #[error("Invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Record still referenced: {message}")]
    ReferencedRecord { message: String, message_id: String },

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Form validation failure with the generic headline
    pub fn invalid_form(errors: FieldErrors) -> Self {
        AppError::Validation {
            message: "Validasi gagal.".to_string(),
            errors,
        }
    }

    /// Whether this error is a foreign key violation reported by Postgres
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            AppError::DatabaseError(sqlx::Error::Database(db)) => {
                db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
            }
            _ => false,
        }
    }

    /// Report a foreign key violation on insert as the referenced row being missing
    pub fn missing_as(self, resource: impl Into<String>) -> Self {
        if self.is_foreign_key_violation() {
            AppError::NotFound(resource.into())
        } else {
            self
        }
    }

    /// Replace a foreign key violation with a friendly message, pass anything else through
    pub fn referenced_as(self, message: &str, message_id: &str) -> Self {
        if self.is_foreign_key_violation() {
            AppError::ReferencedRecord {
                message: message.to_string(),
                message_id: message_id.to_string(),
            }
        } else {
            self
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_id: String,
}

/// Body returned for rejected forms, read directly by the form pages
#[derive(Serialize)]
pub struct FormErrorResponse {
    pub message: String,
    pub errors: FieldErrors,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            // Rejected forms are an expected outcome, not a server fault
            AppError::Validation { message, errors } => {
                tracing::debug!(?errors, "form rejected");
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(FormErrorResponse {
                        message: message.clone(),
                        errors: errors.clone(),
                    }),
                )
                    .into_response();
            }
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message_en: "Invalid username or password".to_string(),
                    message_id: "Username atau password salah".to_string(),
                },
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_TOKEN".to_string(),
                    message_en: "Invalid or expired session".to_string(),
                    message_id: "Sesi tidak valid atau sudah berakhir".to_string(),
                },
            ),
            AppError::InvalidId(e) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_ID".to_string(),
                    message_en: format!("Invalid identifier: {}", e),
                    message_id: "ID tidak valid".to_string(),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_id: format!("{} tidak ditemukan", resource),
                },
            ),
            AppError::ReferencedRecord { message, message_id } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "REFERENCED_RECORD".to_string(),
                    message_en: message.clone(),
                    message_id: message_id.clone(),
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_id: "Terjadi kesalahan pada database".to_string(),
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_id: "Terjadi kesalahan pada server".to_string(),
                },
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
