//! Error types and handling.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Business-rule violations reported back to the caller as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Employee already clocked in on this local day.
    #[error("Entry already registered for today")]
    DuplicateEntry,

    /// Employee already clocked out on this local day.
    #[error("Exit already registered for today")]
    DuplicateExit,

    /// Exit attempted without an entry for the same day.
    #[error("No entry registered for today")]
    MissingEntry,

    /// No shift parameters are active.
    #[error("No active shift parameters found")]
    NoActiveParameters,

    /// Entry attempted at or after the configured cutoff.
    #[error("Entries cannot be registered after {0}")]
    AfterCutoff(String),
}

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Personnel directory answered with a non-success status
    #[error("Directory returned HTTP {0}")]
    Upstream(u16),

    /// Data parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Registration refused by a business rule
    #[error("{0}")]
    Rejected(#[from] Rejection),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a parse error with message
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error with message
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// HTTP status and caller-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Rejected(rejection) => (StatusCode::BAD_REQUEST, rejection.to_string()),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Http(_) | Self::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch personnel data".to_string(),
            ),
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to access attendance records".to_string(),
            ),
            Self::Parse(_) | Self::Config(_) | Self::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::info!("Request rejected: {}", self);
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}
