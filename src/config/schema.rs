//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main toolbox configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolboxConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// WeRead account and API settings
    pub weread: WeReadConfig,

    /// Export behaviour
    #[serde(default)]
    pub export: ExportConfig,

    /// Notion sync settings
    #[serde(default)]
    pub notion: NotionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ToolboxConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.weread.validate()?;
        self.export.validate()?;
        self.notion.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Retry configuration shared by the HTTP clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self, section: &str) -> Result<(), String> {
        if self.max_retries == 0 || self.max_retries > 10 {
            return Err(format!(
                "{section}.retry.max_retries must be between 1 and 10, got {}",
                self.max_retries
            ));
        }
        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "{section}.retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(format!(
                "{section}.retry.initial_delay_ms ({}) cannot exceed max_delay_ms ({})",
                self.initial_delay_ms, self.max_delay_ms
            ));
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// WeRead server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeReadConfig {
    /// Base URL of the WeRead web API
    #[serde(default = "default_weread_base_url")]
    pub base_url: String,

    /// Session cookie copied from a logged-in browser
    /// Stored securely in memory and automatically zeroized on drop
    pub cookie: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl WeReadConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("weread.base_url must start with http:// or https://".to_string());
        }

        if self.cookie.expose_secret().is_empty() {
            return Err("weread.cookie cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("weread.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate("weread")
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the archive is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Extension of each note document inside the archive
    #[serde(default = "default_document_extension")]
    pub document_extension: String,

    /// How long to wait for the presentation side to acknowledge an event
    #[serde(default = "default_progress_ack_timeout_ms")]
    pub progress_ack_timeout_ms: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        let ext = self.document_extension.as_str();
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(format!(
                "export.document_extension must be a bare extension such as 'md', got '{ext}'"
            ));
        }

        if self.progress_ack_timeout_ms > 10_000 {
            return Err(format!(
                "export.progress_ack_timeout_ms must be <= 10000, got {}",
                self.progress_ack_timeout_ms
            ));
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            document_extension: default_document_extension(),
            progress_ack_timeout_ms: default_progress_ack_timeout_ms(),
        }
    }
}

/// Notion configuration
///
/// The database link and token themselves are call parameters of a sync
/// run; they come from the command line or the credential store, not from
/// this section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Base URL of the Notion API
    #[serde(default = "default_notion_base_url")]
    pub api_base_url: String,

    /// Value of the Notion-Version header
    #[serde(default = "default_notion_version")]
    pub api_version: String,

    /// Name of the database's title property
    #[serde(default = "default_title_property")]
    pub title_property: String,

    /// Where the remembered database link and token are stored
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,

    /// Interval between database readiness probes
    #[serde(default = "default_readiness_interval_ms")]
    pub readiness_interval_ms: u64,

    /// Probes before giving up on the database
    #[serde(default = "default_readiness_max_attempts")]
    pub readiness_max_attempts: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl NotionConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err("notion.api_base_url must start with http:// or https://".to_string());
        }

        if self.title_property.trim().is_empty() {
            return Err("notion.title_property cannot be empty".to_string());
        }

        if self.readiness_max_attempts == 0 || self.readiness_max_attempts > 500 {
            return Err(format!(
                "notion.readiness_max_attempts must be between 1 and 500, got {}",
                self.readiness_max_attempts
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("notion.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate("notion")
    }
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_notion_base_url(),
            api_version: default_notion_version(),
            title_property: default_title_property(),
            credentials_path: default_credentials_path(),
            readiness_interval_ms: default_readiness_interval_ms(),
            readiness_max_attempts: default_readiness_max_attempts(),
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_weread_base_url() -> String {
    "https://weread.qq.com".to_string()
}

fn default_notion_base_url() -> String {
    "https://api.notion.com".to_string()
}

fn default_notion_version() -> String {
    "2022-06-28".to_string()
}

fn default_title_property() -> String {
    "Name".to_string()
}

fn default_credentials_path() -> String {
    "weread-credentials.json".to_string()
}

fn default_readiness_interval_ms() -> u64 {
    200
}

fn default_readiness_max_attempts() -> u32 {
    50
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_document_extension() -> String {
    "md".to_string()
}

fn default_progress_ack_timeout_ms() -> u64 {
    250
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
