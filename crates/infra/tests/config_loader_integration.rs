//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use actasti_domain::ActasError;
use actasti_infra::config;
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "api": {
                "api_url": "https://actas.example.test/api/v1",
                "timeout_secs": 15,
                "extra_headers": [["ngrok-skip-browser-warning", "true"]]
            },
            "pagination": {
                "large_limit": 2500,
                "max_requests": 12
            },
            "session": {
                "duration_hours": 6
            },
            "logging": {
                "level": "actasti=debug",
                "json": true
            }
        }"#,
        "json",
    );

    let result = config::load_from_file(Some(path.clone()));
    assert!(result.is_ok(), "Failed to load config from JSON file: {:?}", result.err());

    let config = result.unwrap();

    // Verify API configuration
    assert_eq!(config.api.api_url, "https://actas.example.test/api/v1");
    assert_eq!(config.api.timeout_secs, 15);
    assert_eq!(config.api.login_path, "/auth/login");
    assert_eq!(config.api.extra_headers.len(), 1);

    // Verify pagination bounds
    assert_eq!(config.pagination.large_limit, 2500);
    assert_eq!(config.pagination.max_requests, 12);

    // Verify session and logging
    assert_eq!(config.session.duration_hours, 6);
    assert_eq!(config.logging.level, "actasti=debug");
    assert!(config.logging.json);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let path = write_config(
        r#"
[api]
api_url = "http://localhost:3000/api/v1"

[pagination]
max_requests = 40

[logging]
level = "warn"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("TOML config should load");

    assert_eq!(config.api.api_url, "http://localhost:3000/api/v1");
    assert_eq!(config.pagination.max_requests, 40);
    assert_eq!(config.pagination.large_limit, 5000);
    assert_eq!(config.session.duration_hours, 8);
    assert_eq!(config.logging.level, "warn");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Some("/nonexistent/path/config.json".into()));

    match result {
        Err(ActasError::Config(msg)) => {
            assert!(msg.contains("not found"), "Error message should mention 'not found'");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_load_config_with_invalid_format() {
    let path = write_config(r#"{ "this is": "not valid" "#, "json");

    match config::load_from_file(Some(path.clone())) {
        Err(ActasError::Config(msg)) => {
            assert!(msg.contains("Invalid JSON"), "Error message should mention invalid JSON");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_rejects_relative_api_url() {
    let path = write_config(r#"{ "api": { "api_url": "/api/v1" } }"#, "json");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(ActasError::Config(_))));

    std::fs::remove_file(path).ok();
}
