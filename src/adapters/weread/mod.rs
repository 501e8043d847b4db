//! WeRead adapter
//!
//! The orchestrator only sees the two traits below; [`WeReadClient`]
//! implements both over the WeRead web API.

pub mod client;
pub mod models;
pub mod render;

use crate::domain::{Book, ExportedDocument, Library, Result};
use async_trait::async_trait;

pub use client::WeReadClient;
pub use render::render_book;

/// Lists the books on the user's shelf
#[async_trait]
pub trait LibrarySource: Send + Sync {
    /// Fetches the whole shelf; order is kept for progress reporting
    async fn fetch_library(&self) -> Result<Library>;
}

/// Turns one book's annotations into a document
///
/// A book without annotations is not an error: the returned document has no
/// content or carries the no-notes sentinel.
#[async_trait]
pub trait AnnotationSource: Send + Sync {
    async fn export_book(&self, book: &Book) -> Result<ExportedDocument>;
}
