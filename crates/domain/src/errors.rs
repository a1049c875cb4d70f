//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Actasti
///
/// The variants follow the failure taxonomy of the resolution layer:
/// shape problems and not-found results are recoverable, while
/// authentication and server failures abort any candidate chain.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ActasError {
    #[error("Unexpected response shape: {0}")]
    ShapeMismatch(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Client error ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActasError {
    /// Build the error matching an HTTP status code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            s if s >= 500 => Self::Server { status: s, message },
            s => Self::Client { status: s, message },
        }
    }

    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this failure must stop a chain of candidate endpoints.
    ///
    /// Auth failures and server errors would be equally fatal on every other
    /// candidate, so they surface immediately instead of advancing.
    pub fn aborts_probe_chain(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::Forbidden(_) | Self::Server { .. })
    }

    /// Whether the failure is expected and should be shown as a
    /// non-blocking notice rather than a blocking error state.
    pub fn is_user_facing_notice(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::InvalidInput(_) | Self::ShapeMismatch(_) | Self::Client { .. }
        )
    }
}

/// Result type alias for Actasti operations
pub type Result<T> = std::result::Result<T, ActasError>;
