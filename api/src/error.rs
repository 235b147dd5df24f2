//! Unified error types for the Prophet API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Repository and domain errors
//! - `FeedError`: Feed download and parsing errors
//! - `LlmError`: Chat-completion client errors
//! - `ConfigError`: Startup configuration errors
//! - `AppError`: Application layer errors (wraps the others for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors - storage and business logic
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Feed source errors
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Feed returned status {status}")]
    Status { status: u16 },

    #[error("Failed to parse feed: {0}")]
    Parse(String),

    #[error("Feed entry {entry} is missing {field}")]
    MissingField { entry: String, field: &'static str },

    #[error("Invalid publish date {value:?}: {reason}")]
    InvalidDate { value: String, reason: String },
}

/// Chat-completion client errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Unauthorized - invalid API key")]
    Unauthorized,

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// Configuration errors, raised once at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "Not found", Some(msg.clone()))
            }
            AppError::Domain(DomainError::AlreadyExists(msg)) => {
                (StatusCode::CONFLICT, "Already exists", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Database(msg))
            | AppError::Domain(DomainError::Storage(msg)) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Feed(e) => {
                tracing::error!("Feed error: {}", e);
                (StatusCode::BAD_GATEWAY, "Feed error", Some(e.to_string()))
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {}", e);
                match e {
                    LlmError::RateLimited => {
                        (StatusCode::TOO_MANY_REQUESTS, "Rate limited", None)
                    }
                    LlmError::EmptyResponse => (
                        StatusCode::BAD_GATEWAY,
                        "LLM service error",
                        Some(e.to_string()),
                    ),
                    _ => (StatusCode::BAD_GATEWAY, "LLM service error", None),
                }
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
