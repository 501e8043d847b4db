//! Configuration management for the toolbox.
//!
//! # Overview
//!
//! The toolbox reads a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `TOOLBOX_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`WeReadConfig`] - WeRead session cookie, endpoint and retries
//! - [`ExportConfig`] - Archive output directory and document extension
//! - [`NotionConfig`] - Notion API endpoint, title property, readiness polling
//! - [`LoggingConfig`] - File logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [weread]
//! cookie = "${WEREAD_COOKIE}"
//!
//! [export]
//! output_dir = "exports"
//!
//! [notion]
//! title_property = "Name"
//! ```
//!
//! The Notion database link and token are not part of this file. They are
//! passed to each sync run, optionally remembered in a [`CredentialStore`].

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod secret;

pub use credentials::{CredentialStore, FileCredentialStore, StoredCredentials};
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ExportConfig, LoggingConfig, NotionConfig, RetryConfig, ToolboxConfig,
    WeReadConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
