//! API-specific error types
//!
//! Classifies transport and status failures of backend calls before they are
//! converted into the domain error at the service boundary.

use actasti_domain::ActasError;
use reqwest::StatusCode;
use thiserror::Error;

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Client error ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Map a non-success response status.
    pub fn from_status(status: StatusCode, url: &str, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("{} returned status {}", url, status)
        } else {
            format!("{} returned status {}: {}", url, status, body.trim())
        };

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimit(message),
            s if s.is_server_error() => Self::Server { status: s.as_u16(), message },
            s if s.is_client_error() => Self::Client { status: s.as_u16(), message },
            _ => Self::Network(message),
        }
    }
}

impl From<ActasError> for ApiError {
    fn from(err: ActasError) -> Self {
        match err {
            ActasError::Unauthorized(message) => Self::Unauthorized(message),
            ActasError::Forbidden(message) => Self::Forbidden(message),
            ActasError::NotFound(message) => Self::NotFound(message),
            ActasError::Server { status, message } => Self::Server { status, message },
            ActasError::Client { status, message } => Self::Client { status, message },
            ActasError::ShapeMismatch(message) => Self::Decode(message),
            ActasError::Network(message) => Self::Network(message),
            ActasError::InvalidInput(message) => Self::Client { status: 400, message },
            ActasError::Config(message) | ActasError::Internal(message) => Self::Config(message),
        }
    }
}

impl From<ApiError> for ActasError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(message) => Self::Unauthorized(message),
            ApiError::Forbidden(message) => Self::Forbidden(message),
            ApiError::NotFound(message) => Self::NotFound(message),
            ApiError::RateLimit(message) => Self::Client { status: 429, message },
            ApiError::Server { status, message } => Self::Server { status, message },
            ApiError::Client { status, message } => Self::Client { status, message },
            ApiError::Decode(message) => Self::ShapeMismatch(message),
            ApiError::Network(message) => Self::Network(message),
            ApiError::Config(message) => Self::Config(message),
        }
    }
}
