//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX so they do
//! not interfere with each other.

use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use weread_toolbox::config::load_config;
use weread_toolbox::domain::ToolboxError;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("TOOLBOX_APPLICATION_LOG_LEVEL");
    std::env::remove_var("TOOLBOX_WEREAD_COOKIE");
    std::env::remove_var("TOOLBOX_EXPORT_OUTPUT_DIR");
    std::env::remove_var("TOOLBOX_NOTION_TITLE_PROPERTY");
    std::env::remove_var("TEST_WEREAD_COOKIE");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[weread]
base_url = "https://weread.example.com"
cookie = "wr_skey=abc; wr_vid=1"
timeout_seconds = 10

[weread.retry]
max_retries = 5
initial_delay_ms = 100
max_delay_ms = 1000
backoff_multiplier = 1.5

[export]
output_dir = "/tmp/weread"
document_extension = "txt"
progress_ack_timeout_ms = 100

[notion]
api_base_url = "https://notion.example.com"
api_version = "2022-06-28"
title_property = "Title"
credentials_path = "/tmp/creds.json"
readiness_interval_ms = 50
readiness_max_attempts = 10
timeout_seconds = 15

[logging]
local_enabled = false
local_path = "/tmp/weread-logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");

    assert_eq!(config.weread.base_url, "https://weread.example.com");
    assert_eq!(
        config.weread.cookie.expose_secret().as_str(),
        "wr_skey=abc; wr_vid=1"
    );
    assert_eq!(config.weread.timeout_seconds, 10);
    assert_eq!(config.weread.retry.max_retries, 5);
    assert_eq!(config.weread.retry.backoff_multiplier, 1.5);

    assert_eq!(config.export.output_dir, "/tmp/weread");
    assert_eq!(config.export.document_extension, "txt");
    assert_eq!(config.export.progress_ack_timeout_ms, 100);

    assert_eq!(config.notion.api_base_url, "https://notion.example.com");
    assert_eq!(config.notion.title_property, "Title");
    assert_eq!(config.notion.credentials_path, "/tmp/creds.json");
    assert_eq!(config.notion.readiness_interval_ms, 50);
    assert_eq!(config.notion.readiness_max_attempts, 10);

    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_path, "/tmp/weread-logs");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[weread]
cookie = "wr_skey=abc"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.weread.base_url, "https://weread.qq.com");
    assert_eq!(config.weread.retry.max_retries, 3);
    assert_eq!(config.export.output_dir, ".");
    assert_eq!(config.export.document_extension, "md");
    assert_eq!(config.notion.api_base_url, "https://api.notion.com");
    assert_eq!(config.notion.title_property, "Name");
    assert_eq!(config.notion.readiness_interval_ms, 200);
    assert_eq!(config.notion.readiness_max_attempts, 50);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_WEREAD_COOKIE", "wr_skey=from_env");

    let temp_file = write_config(
        r#"
[weread]
cookie = "${TEST_WEREAD_COOKIE}"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(
        config.weread.cookie.expose_secret().as_str(),
        "wr_skey=from_env"
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[weread]
cookie = "${TEST_WEREAD_COOKIE}"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(matches!(err, ToolboxError::Configuration(_)));
    assert!(err.to_string().contains("TEST_WEREAD_COOKIE"));
}

#[test]
fn test_env_overrides_win_over_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TOOLBOX_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("TOOLBOX_EXPORT_OUTPUT_DIR", "/tmp/override");
    std::env::set_var("TOOLBOX_NOTION_TITLE_PROPERTY", "书名");

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[weread]
cookie = "wr_skey=abc"

[export]
output_dir = "/tmp/original"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.export.output_dir, "/tmp/override");
    assert_eq!(config.notion.title_property, "书名");

    cleanup_env_vars();
}

#[test]
fn test_missing_cookie_is_invalid() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[weread]
cookie = ""
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("weread.cookie"));
}

#[test]
fn test_invalid_document_extension() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[weread]
cookie = "wr_skey=abc"

[export]
document_extension = ".md"
"#,
    );

    assert!(load_config(temp_file.path()).is_err());
}

#[test]
fn test_missing_file() {
    let err = load_config("/nonexistent/weread-toolbox.toml").unwrap_err();
    assert!(err.to_string().contains("not found"));
}
