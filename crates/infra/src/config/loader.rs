//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the API URL is not set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ACTASTI_API_URL`: Base URL of the protected API (required)
//! - `ACTASTI_HTTP_TIMEOUT`: Request timeout in seconds
//! - `ACTASTI_PAGINATION_LARGE_LIMIT`: Page size of the large-limit probe
//! - `ACTASTI_PAGINATION_MAX_REQUESTS`: Request cap per discovery run
//! - `ACTASTI_SESSION_HOURS`: Session lifetime in hours
//! - `ACTASTI_LOG_LEVEL`: Default log filter
//! - `ACTASTI_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./actasti.json` or `./actasti.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use actasti_domain::{ActasError, Config, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ActasError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value fails validation
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `ACTASTI_API_URL` must be present; every other variable falls back to
/// its default when unset.
///
/// # Errors
/// Returns `ActasError::Config` if the API URL is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.api.api_url = env_var("ACTASTI_API_URL")?;
    if let Some(timeout) = env_parse::<u64>("ACTASTI_HTTP_TIMEOUT", "timeout")? {
        config.api.timeout_secs = timeout;
    }

    if let Some(limit) = env_parse::<usize>("ACTASTI_PAGINATION_LARGE_LIMIT", "large limit")? {
        config.pagination.large_limit = limit;
    }
    if let Some(max) = env_parse::<usize>("ACTASTI_PAGINATION_MAX_REQUESTS", "request cap")? {
        config.pagination.max_requests = max;
    }

    if let Some(hours) = env_parse::<u64>("ACTASTI_SESSION_HOURS", "session hours")? {
        config.session.duration_hours = hours;
    }

    if let Ok(level) = std::env::var("ACTASTI_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("ACTASTI_LOG_JSON", config.logging.json);

    validate(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ActasError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - A value fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ActasError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ActasError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ActasError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path).and_then(validate)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ActasError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ActasError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ActasError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Reject values the services cannot work with.
fn validate(config: Config) -> Result<Config> {
    let api_url = config.api.api_url.trim();
    if api_url.is_empty() {
        return Err(ActasError::Config("API URL must not be empty".to_string()));
    }
    url::Url::parse(api_url)
        .map_err(|e| ActasError::Config(format!("Invalid API URL {}: {}", api_url, e)))?;

    if config.api.timeout_secs == 0 {
        return Err(ActasError::Config("HTTP timeout must be positive".to_string()));
    }
    if config.pagination.large_limit == 0 || config.pagination.max_requests == 0 {
        return Err(ActasError::Config("Pagination bounds must be positive".to_string()));
    }
    if config.session.duration_hours == 0 {
        return Err(ActasError::Config("Session duration must be positive".to_string()));
    }
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./actasti.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("actasti.json"),
        dir.join("actasti.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `ActasError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ActasError::Config(format!("Missing required environment variable: {}", key)))
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `ActasError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ActasError::Config(format!("Invalid {}: {}", what, e))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
