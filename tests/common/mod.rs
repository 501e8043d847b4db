//! In-memory collaborators for orchestrator tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::watch;
use weread_toolbox::adapters::notion::{SyncCredentials, SyncTarget};
use weread_toolbox::adapters::weread::{AnnotationSource, LibrarySource};
use weread_toolbox::core::progress::{Delivery, ProgressEvent, ProgressKind, ProgressSink};
use weread_toolbox::domain::{
    Book, BookId, ExportedDocument, Library, NotionError, Result, ToolboxError, WeReadError,
    NO_NOTES_SENTINEL,
};

pub fn book(id: &str, title: &str) -> Book {
    Book::new(BookId::new(id).unwrap(), title)
}

/// Shelf with a fixed list of books, or a fetch failure
pub struct FakeLibrary {
    books: Option<Vec<Book>>,
    pub calls: AtomicUsize,
}

impl FakeLibrary {
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: Some(books),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            books: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LibrarySource for FakeLibrary {
    async fn fetch_library(&self) -> Result<Library> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.books {
            Some(books) => Ok(Library::new(books.clone())),
            None => Err(ToolboxError::WeRead(WeReadError::SessionExpired(
                "errcode -2012".to_string(),
            ))),
        }
    }
}

/// What the annotation source returns for one book
#[derive(Clone)]
pub enum Notes {
    Markdown(String),
    Sentinel,
    Missing,
    Fail(String),
}

/// Annotation source keyed by book id
#[derive(Default)]
pub struct FakeAnnotations {
    notes: HashMap<String, Notes>,
    calls: Mutex<Vec<String>>,
    shutdown_after: Mutex<Option<(usize, watch::Sender<bool>)>>,
}

impl FakeAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, book_id: &str, notes: Notes) -> Self {
        self.notes.insert(book_id.to_string(), notes);
        self
    }

    /// Raises the shutdown flag once `count` books were requested
    pub fn shutdown_after(self, count: usize, sender: watch::Sender<bool>) -> Self {
        *self.shutdown_after.lock().unwrap() = Some((count, sender));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnnotationSource for FakeAnnotations {
    async fn export_book(&self, book: &Book) -> Result<ExportedDocument> {
        let calls = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(book.id.as_str().to_string());
            calls.len()
        };

        if let Some((count, sender)) = self.shutdown_after.lock().unwrap().as_ref() {
            if calls >= *count {
                let _ = sender.send(true);
            }
        }

        match self.notes.get(book.id.as_str()).cloned() {
            Some(Notes::Markdown(body)) => Ok(ExportedDocument::new(&book.title, body)),
            Some(Notes::Sentinel) => Ok(ExportedDocument::new(
                &book.title,
                format!("# {}\n\n{NO_NOTES_SENTINEL}", book.title),
            )),
            Some(Notes::Missing) | None => Ok(ExportedDocument::empty(&book.title)),
            Some(Notes::Fail(message)) => Err(ToolboxError::WeRead(WeReadError::Status {
                status: 500,
                message,
            })),
        }
    }
}

/// Progress sink that keeps every event
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, kind: ProgressKind) -> usize {
        self.events().iter().filter(|e| e.kind == kind).count()
    }
}

#[async_trait]
impl ProgressSink for RecordingSink {
    async fn emit(&self, event: ProgressEvent) -> Delivery {
        self.events.lock().unwrap().push(event);
        Delivery::Acknowledged
    }
}

/// Sync target recording pushed titles
#[derive(Default)]
pub struct FakeTarget {
    prepare_fails: bool,
    failing_titles: Vec<String>,
    pub prepare_calls: AtomicUsize,
    pushed: Mutex<Vec<String>>,
}

impl FakeTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn never_ready() -> Self {
        Self {
            prepare_fails: true,
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, title: &str) -> Self {
        self.failing_titles.push(title.to_string());
        self
    }

    pub fn pushed(&self) -> Vec<String> {
        self.pushed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SyncTarget for FakeTarget {
    async fn prepare(&self, _credentials: &SyncCredentials) -> Result<()> {
        self.prepare_calls.fetch_add(1, Ordering::SeqCst);
        if self.prepare_fails {
            return Err(ToolboxError::NotReady {
                resource: "Notion database".to_string(),
                attempts: 50,
            });
        }
        Ok(())
    }

    async fn push(&self, document: &ExportedDocument, _credentials: &SyncCredentials) -> Result<()> {
        if self.failing_titles.contains(&document.title) {
            return Err(ToolboxError::Notion(NotionError::RateLimited(
                "slow down".to_string(),
            )));
        }
        self.pushed.lock().unwrap().push(document.title.clone());
        Ok(())
    }
}
