// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("User already exists with this email")]
    Conflict,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid OTP")]
    InvalidChallenge,

    #[error("OTP has expired")]
    ChallengeExpired,

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("Access token required")]
    Unauthenticated,

    #[error("Upstream dependency failed: {0}")]
    Dependency(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body.
///
/// Mirrors the success envelope: every response carries `success` and a
/// human-readable `message`. Field-level validation failures are listed in
/// `errors`. Internal detail (store errors, upstream failures) is logged
/// server-side and never exposed to the caller.
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(errors),
            ),
            AppError::Conflict => (
                StatusCode::CONFLICT,
                "User already exists with this email".to_string(),
                None,
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::InvalidChallenge => {
                (StatusCode::BAD_REQUEST, "Invalid OTP".to_string(), None)
            }
            AppError::ChallengeExpired => {
                (StatusCode::BAD_REQUEST, "OTP has expired".to_string(), None)
            }
            AppError::InvalidCredential => (
                StatusCode::UNAUTHORIZED,
                "Invalid credentials".to_string(),
                None,
            ),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Access token required".to_string(),
                None,
            ),
            AppError::Dependency(msg) => {
                tracing::error!(error = %msg, "Upstream dependency failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "Service temporarily unavailable".to_string(),
                    None,
                )
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
