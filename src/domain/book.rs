//! Books, libraries and rendered note documents

use super::errors::FailureReason;
use super::ids::BookId;
use serde::{Deserialize, Serialize};

/// Marker a rendered document carries when the book has no annotations
///
/// The renderer writes it in place of the note body; the orchestrator tests
/// for it to count a book as empty instead of exported.
pub const NO_NOTES_SENTINEL: &str = "没有任何笔记";

/// One book on the user's shelf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// WeRead book id
    pub id: BookId,

    /// Display title, also the archive file name stem
    pub title: String,

    /// Author, when the shelf lists one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Book {
    /// Creates a book without author information
    pub fn new(id: BookId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: None,
        }
    }

    /// Sets the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// The user's shelf, in the order the server returned it
///
/// The position of a book in this list is the index used for progress
/// reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    /// Wraps an ordered list of books
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// Number of books
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the shelf is empty
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Iterates the books in shelf order
    pub fn iter(&self) -> std::slice::Iter<'_, Book> {
        self.books.iter()
    }
}

impl From<Vec<Book>> for Library {
    fn from(books: Vec<Book>) -> Self {
        Self::new(books)
    }
}

impl<'a> IntoIterator for &'a Library {
    type Item = &'a Book;
    type IntoIter = std::slice::Iter<'a, Book>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.iter()
    }
}

/// A book's annotations rendered to Markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    /// Book title
    pub title: String,

    /// Markdown body; `None` when the source had nothing to render
    pub content: Option<String>,
}

impl ExportedDocument {
    /// Creates a document with content
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Some(content.into()),
        }
    }

    /// Creates a document for a book the source returned nothing for
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
        }
    }

    /// True when the document holds no annotations
    ///
    /// Either no content at all, or a body carrying [`NO_NOTES_SENTINEL`].
    /// A leading `# title` heading is not part of the body.
    pub fn has_no_notes(&self) -> bool {
        match &self.content {
            None => true,
            Some(content) => {
                content.trim().is_empty() || Self::body(content).contains(NO_NOTES_SENTINEL)
            }
        }
    }

    fn body(content: &str) -> &str {
        match content.trim_start().strip_prefix("# ") {
            Some(heading) => heading.split_once('\n').map_or("", |(_, rest)| rest),
            None => content,
        }
    }
}

/// Per-book result of an export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Document written to the archive or synced
    Exported,
    /// Book has no annotations
    Empty,
    /// Fetch or sync failed
    Failed(FailureReason),
}

impl ExportOutcome {
    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            ExportOutcome::Exported => "exported",
            ExportOutcome::Empty => "empty",
            ExportOutcome::Failed(_) => "failed",
        }
    }
}
