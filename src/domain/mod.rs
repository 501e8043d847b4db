//! Domain models and types for the toolbox.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`BookId`], [`DatabaseId`])
//! - **Domain models** ([`Book`], [`Library`], [`ExportedDocument`], [`ExportOutcome`])
//! - **Error types** ([`ToolboxError`], [`WeReadError`], [`NotionError`], [`FailureReason`])
//! - **Result type alias** ([`Result`])
//!
//! # Empty books
//!
//! A book whose rendered document has no content, or whose content carries
//! [`NO_NOTES_SENTINEL`], is counted as empty rather than exported:
//!
//! ```rust
//! use weread_toolbox::domain::{ExportedDocument, NO_NOTES_SENTINEL};
//!
//! let doc = ExportedDocument::new("三体", format!("# 三体\n\n{NO_NOTES_SENTINEL}"));
//! assert!(doc.has_no_notes());
//! ```

pub mod book;
pub mod errors;
pub mod ids;
pub mod result;

pub use book::{Book, ExportOutcome, ExportedDocument, Library, NO_NOTES_SENTINEL};
pub use errors::{FailureReason, NotionError, ToolboxError, WeReadError};
pub use ids::{BookId, DatabaseId};
pub use result::Result;
