// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::db::StoreError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error")]
    Validation(Vec<FieldError>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::StorageUnavailable(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            StoreError::Unavailable(msg) => AppError::StorageUnavailable(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<FieldError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation(details) => ErrorResponse {
                error: "validation_error",
                message: "Validation error".to_string(),
                details,
            },
            AppError::Conflict(msg) => {
                tracing::warn!(reason = %msg, "Conflict");
                ErrorResponse {
                    error: "conflict",
                    message: msg,
                    details: Vec::new(),
                }
            }
            AppError::NotFound(msg) => ErrorResponse {
                error: "not_found",
                message: msg,
                details: Vec::new(),
            },
            AppError::BadRequest(msg) => ErrorResponse {
                error: "bad_request",
                message: msg,
                details: Vec::new(),
            },
            AppError::Upstream(msg) => {
                tracing::error!(error = %msg, "Upstream service error");
                ErrorResponse {
                    error: "upstream_error",
                    message: "Upstream service error".to_string(),
                    details: Vec::new(),
                }
            }
            AppError::StorageUnavailable(msg) => {
                tracing::error!(error = %msg, "Storage unavailable");
                server_error()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                server_error()
            }
        };

        (status, Json(body)).into_response()
    }
}

fn server_error() -> ErrorResponse {
    ErrorResponse {
        error: "internal_error",
        message: "Server error".to_string(),
        details: Vec::new(),
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
