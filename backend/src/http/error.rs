//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::calendar_adapter::{DropError, EventSpan};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Placement the calendar should snap the event back to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revert: Option<EventSpan>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            revert: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_revert(mut self, revert: EventSpan) -> Self {
        self.revert = Some(revert);
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
    /// A drop or resize that the calendar must undo
    DropFailed { error: DropError, revert: EventSpan },
}

fn repository_response(e: &RepositoryError) -> (StatusCode, ApiError) {
    let (status, code) = match e {
        RepositoryError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        RepositoryError::ValidationError { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        RepositoryError::ConnectionError { .. }
        | RepositoryError::UpstreamError { .. }
        | RepositoryError::TimeoutError { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        RepositoryError::ConfigurationError { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "REPOSITORY_ERROR")
        }
    };

    let mut error = ApiError::new(code, e.message());
    if let Some(details) = &e.context().details {
        error = error.with_details(details.clone());
    }
    (status, error)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(e) => {
                tracing::warn!("Repository error: {}", e);
                repository_response(&e)
            }
            AppError::DropFailed { error, revert } => {
                let (status, body) = match &error {
                    DropError::InvalidSpan { .. } => (
                        StatusCode::BAD_REQUEST,
                        ApiError::new("INVALID_SPAN", error.toast()),
                    ),
                    DropError::Repository(e) | DropError::Refresh(e) => {
                        let (status, body) = repository_response(e);
                        (status, ApiError { message: error.toast(), ..body })
                    }
                };
                (status, body.with_revert(revert))
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
