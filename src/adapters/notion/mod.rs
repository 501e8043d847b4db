//! Notion adapter
//!
//! [`SyncTarget`] is what the orchestrator pushes documents to;
//! [`NotionClient`] implements it by replacing the database page whose title
//! matches the book, so running a sync twice leaves one page per book.

pub mod blocks;
pub mod client;

use crate::config::SecretString;
use crate::domain::{DatabaseId, ExportedDocument, Result};
use async_trait::async_trait;

pub use client::{resolve_database_id, NotionClient};

/// Where and as whom to sync
#[derive(Debug, Clone)]
pub struct SyncCredentials {
    pub database_id: DatabaseId,
    pub token: SecretString,
}

impl SyncCredentials {
    /// Creates credentials from an already parsed database id
    pub fn new(database_id: DatabaseId, token: SecretString) -> Self {
        Self { database_id, token }
    }
}

/// Remote destination for exported documents
#[async_trait]
pub trait SyncTarget: Send + Sync {
    /// Called once per run before the library is fetched
    async fn prepare(&self, credentials: &SyncCredentials) -> Result<()>;

    /// Persists one document; pushing the same title twice replaces it
    async fn push(&self, document: &ExportedDocument, credentials: &SyncCredentials) -> Result<()>;
}
