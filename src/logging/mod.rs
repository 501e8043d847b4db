//! Logging and observability
//!
//! Structured logging with support for:
//! - Console output
//! - Configurable log levels
//! - JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use weread_toolbox::logging::init_logging;
//! use weread_toolbox::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(books = 12, "Library fetched");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
