//! Domain error types
//!
//! This module defines the error hierarchy for the toolbox.
//! Adapter errors are converted into [`ToolboxError`] and never expose
//! third-party HTTP client types.

use thiserror::Error;

/// Main toolbox error type
///
/// This is the primary error type used throughout the application.
/// Only a handful of variants are fatal to an export run; per-book failures
/// are captured as [`FailureReason`] and never surface as a `ToolboxError`.
#[derive(Debug, Error)]
pub enum ToolboxError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// WeRead API errors
    #[error("WeRead error: {0}")]
    WeRead(#[from] WeReadError),

    /// Notion API errors
    #[error("Notion error: {0}")]
    Notion(#[from] NotionError),

    /// The library (shelf) could not be fetched; fatal to the run
    #[error("Failed to fetch library: {0}")]
    LibraryFetch(String),

    /// Sync requested without a database id or access token
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Another run of the same kind holds the run guard
    #[error("A {0} run is already in progress")]
    RunInProgress(String),

    /// A polled precondition never became true
    #[error("Resource not ready after {attempts} attempts: {resource}")]
    NotReady { resource: String, attempts: u32 },

    /// Archive assembly errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ToolboxError {
    /// Whether a retry of the failed request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ToolboxError::WeRead(e) => e.is_retryable(),
            ToolboxError::Notion(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// WeRead-specific errors
#[derive(Debug, Error)]
pub enum WeReadError {
    /// Failed to reach the WeRead server
    #[error("Failed to connect to WeRead: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The session cookie was rejected (errcode -2012)
    #[error("Session expired, refresh the WeRead cookie: {0}")]
    SessionExpired(String),

    /// The API answered with a non-zero errcode
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// Non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl WeReadError {
    /// Connection problems, timeouts, 429 and 5xx are worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            WeReadError::ConnectionFailed(_) | WeReadError::Timeout(_) => true,
            WeReadError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Notion-specific errors
#[derive(Debug, Error)]
pub enum NotionError {
    /// Failed to reach the Notion API
    #[error("Failed to connect to Notion: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Token rejected (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Database or page not found, or not shared with the integration (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited (429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The database link could not be turned into a database id
    #[error("Invalid database link: {0}")]
    InvalidDatabaseLink(String),

    /// Body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NotionError {
    /// Connection problems, timeouts, 429 and 5xx are worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            NotionError::ConnectionFailed(_)
            | NotionError::Timeout(_)
            | NotionError::RateLimited(_) => true,
            NotionError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Why a single book could not be exported
///
/// Recoverable: the orchestrator records it in the summary and moves on to
/// the next book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReason {
    /// Book the failure belongs to
    pub book_id: Option<String>,

    /// Error message
    pub message: String,

    /// Stage that failed ("fetch" or "sync")
    pub stage: &'static str,
}

impl FailureReason {
    /// Creates a failure reason for the annotation fetch stage
    pub fn fetch(message: impl Into<String>) -> Self {
        Self {
            book_id: None,
            message: message.into(),
            stage: "fetch",
        }
    }

    /// Creates a failure reason for the sync stage
    pub fn sync(message: impl Into<String>) -> Self {
        Self {
            book_id: None,
            message: message.into(),
            stage: "sync",
        }
    }

    /// Sets the book id
    pub fn with_book_id(mut self, book_id: impl Into<String>) -> Self {
        self.book_id = Some(book_id.into());
        self
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.message)
    }
}

impl From<std::io::Error> for ToolboxError {
    fn from(err: std::io::Error) -> Self {
        ToolboxError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ToolboxError {
    fn from(err: serde_json::Error) -> Self {
        ToolboxError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ToolboxError {
    fn from(err: toml::de::Error) -> Self {
        ToolboxError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<zip::result::ZipError> for ToolboxError {
    fn from(err: zip::result::ZipError) -> Self {
        ToolboxError::Archive(err.to_string())
    }
}
