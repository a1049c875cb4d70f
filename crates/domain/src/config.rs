//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LARGE_LIMIT, DEFAULT_MAX_PAGE_REQUESTS,
    DEFAULT_SESSION_HOURS, LOGIN_PATH,
};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub pagination: PaginationConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the protected API, e.g. `http://localhost:3000/api/v1`
    pub api_url: String,
    pub timeout_secs: u64,
    /// Path of the login endpoint, relative to `api_url`
    pub login_path: String,
    /// Extra headers sent to the protected API only
    pub extra_headers: Vec<(String, String)>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            login_path: LOGIN_PATH.to_string(),
            extra_headers: Vec::new(),
        }
    }
}

/// Bounds for inventory pagination discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size requested by the "give me everything" probe
    pub large_limit: usize,
    /// Hard cap on network calls per discovery run, initial fetch included
    pub max_requests: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { large_limit: DEFAULT_LARGE_LIMIT, max_requests: DEFAULT_MAX_PAGE_REQUESTS }
    }
}

/// Session lifetime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub duration_hours: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { duration_hours: DEFAULT_SESSION_HOURS }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fall_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"api": {"api_url": "https://example.test/api"}}"#).unwrap();

        assert_eq!(config.api.api_url, "https://example.test/api");
        assert_eq!(config.api.login_path, LOGIN_PATH);
        assert_eq!(config.pagination.large_limit, DEFAULT_LARGE_LIMIT);
        assert_eq!(config.session.duration_hours, 8);
        assert_eq!(config.logging.level, "info");
    }
}
