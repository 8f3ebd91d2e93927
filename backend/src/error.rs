//! Error handling for the Parts Inventory Management backend

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Caller-supplied required field missing or blank
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Underlying persistence call failed for infrastructure reasons
    #[error("Store error: {0}")]
    Store(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
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
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{resource} not found"),
                    field: None,
                },
            ),
            AppError::Store(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "STORE_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {msg}"),
                    field: None,
                },
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
