//! WeRead web API client
//!
//! Authenticates with the session cookie copied from a logged-in browser.
//! WeRead reports most failures as HTTP 200 with an `errcode` in the body;
//! those are turned into [`WeReadError::Api`], and `-2012` into
//! [`WeReadError::SessionExpired`].

use super::models::{BookmarkList, ReviewList, ShelfBook, ShelfResponse};
use super::render::render_book;
use super::{AnnotationSource, LibrarySource};
use crate::config::{SecretString, WeReadConfig};
use crate::core::retry::RetryPolicy;
use crate::domain::{Book, BookId, ExportedDocument, Library, Result, ToolboxError, WeReadError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// errcode WeRead answers with once the cookie is no longer valid
pub const SESSION_EXPIRED_ERRCODE: i64 = -2012;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// HTTP client for the WeRead web API
pub struct WeReadClient {
    base_url: String,
    client: Client,
    cookie: SecretString,
    retry: RetryPolicy,
}

impl WeReadClient {
    /// Create a new client from configuration
    pub fn new(config: &WeReadConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)))
            .build()
            .map_err(|e| {
                ToolboxError::Configuration(format!("Failed to build WeRead HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            cookie: config.cookie.clone(),
            retry: RetryPolicy::from_config(&config.retry),
        })
    }

    /// Books on the user's shelf, in shelf order
    pub async fn shelf(&self) -> Result<ShelfResponse> {
        self.get_json("shelf", "/web/shelf/sync", &[]).await
    }

    /// Highlights and chapter titles of one book
    pub async fn bookmarks(&self, book_id: &BookId) -> Result<BookmarkList> {
        self.get_json(
            "bookmarks",
            "/web/book/bookmarklist",
            &[("bookId", book_id.as_str())],
        )
        .await
    }

    /// The user's own thoughts and reviews on one book
    pub async fn reviews(&self, book_id: &BookId) -> Result<ReviewList> {
        self.get_json(
            "reviews",
            "/web/review/list",
            &[
                ("bookId", book_id.as_str()),
                ("listType", "11"),
                ("mine", "1"),
                ("synckey", "0"),
            ],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let body = self
            .retry
            .run(operation, || async {
                let response = self
                    .client
                    .get(&url)
                    .query(query)
                    .header("Cookie", self.cookie.expose_secret().as_str())
                    .send()
                    .await
                    .map_err(map_transport_error)?;

                let status = response.status();
                let text = response
                    .text()
                    .await
                    .map_err(|e| WeReadError::InvalidResponse(e.to_string()))?;

                if !status.is_success() {
                    return Err(WeReadError::Status {
                        status: status.as_u16(),
                        message: text,
                    }
                    .into());
                }

                Ok::<_, ToolboxError>(text)
            })
            .await?;

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| WeReadError::InvalidResponse(format!("{operation}: {e}")))?;
        check_errcode(&value)?;

        serde_json::from_value(value)
            .map_err(|e| WeReadError::InvalidResponse(format!("{operation}: {e}")).into())
    }
}

fn map_transport_error(e: reqwest::Error) -> ToolboxError {
    if e.is_timeout() {
        WeReadError::Timeout(e.to_string()).into()
    } else {
        WeReadError::ConnectionFailed(e.to_string()).into()
    }
}

fn check_errcode(value: &serde_json::Value) -> Result<()> {
    let code = value.get("errcode").and_then(|c| c.as_i64()).unwrap_or(0);
    if code == 0 {
        return Ok(());
    }

    let message = value
        .get("errmsg")
        .and_then(|m| m.as_str())
        .unwrap_or_default()
        .to_string();

    if code == SESSION_EXPIRED_ERRCODE {
        return Err(WeReadError::SessionExpired(message).into());
    }
    Err(WeReadError::Api { code, message }.into())
}

#[async_trait]
impl LibrarySource for WeReadClient {
    async fn fetch_library(&self) -> Result<Library> {
        let shelf = self.shelf().await?;
        let skipped = shelf.books.iter().filter(|b| b.book_id.trim().is_empty()).count();
        if skipped > 0 {
            tracing::warn!(skipped = skipped, "Shelf entries without a book id ignored");
        }

        let books: Vec<Book> = shelf.books.iter().filter_map(ShelfBook::to_domain).collect();
        tracing::info!(count = books.len(), "Fetched shelf");
        Ok(Library::new(books))
    }
}

#[async_trait]
impl AnnotationSource for WeReadClient {
    async fn export_book(&self, book: &Book) -> Result<ExportedDocument> {
        let bookmarks = self.bookmarks(&book.id).await?;
        let reviews = self.reviews(&book.id).await?;

        tracing::debug!(
            book_id = %book.id,
            highlights = bookmarks.updated.len(),
            reviews = reviews.reviews.len(),
            "Fetched annotations"
        );

        Ok(render_book(book, &bookmarks, &reviews))
    }
}
