// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad input to login/signup or an unusable upload.
    #[error("{0}")]
    Validation(String),

    /// The caption service has no credentials configured.
    #[error("{0}")]
    Configuration(String),

    /// Both caption models failed.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// A single Gemini call failed.
    #[error("Gemini API error: {0}")]
    GeminiApi(String),

    #[error("Daily quota reached. Upgrade to Pro for unlimited access.")]
    QuotaExceeded,

    #[error("Log in to upgrade to Pro.")]
    LoginRequired,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message shown to the user.
    ///
    /// Storage and internal failures are logged and replaced by a generic
    /// message; everything else is already phrased for the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Storage(_) | AppError::Internal(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Whether repeating the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::ServiceUnavailable(_)
                | AppError::GeminiApi(_)
                | AppError::Storage(_)
                | AppError::Internal(_)
        )
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::Configuration(msg) => {
                tracing::error!(error = %msg, "Caption service misconfigured");
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            AppError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
            }
            AppError::GeminiApi(_) => (StatusCode::BAD_GATEWAY, "gemini_error"),
            AppError::QuotaExceeded => (StatusCode::TOO_MANY_REQUESTS, "quota_exceeded"),
            AppError::LoginRequired => (StatusCode::UNAUTHORIZED, "login_required"),
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers and services
pub type Result<T> = std::result::Result<T, AppError>;
