//! Bulk export orchestration
//!
//! [`BatchOrchestrator`] walks the whole library one book at a time. Each
//! book goes through a step function returning
//! `Result<_, FailureReason>`; a failed book is recorded in the summary and
//! the loop moves on. Only three things end a run early: the library cannot
//! be fetched, sync credentials are missing or unusable, or a run of the
//! same kind is already active.
//!
//! Every run reports on one progress key: an `Info` event per book, in
//! library order, followed by exactly one terminal `Success` or `Error`.

use super::request::ExportRequest;
use super::summary::ExportSummary;
use crate::adapters::notion::{resolve_database_id, SyncCredentials, SyncTarget};
use crate::adapters::weread::{AnnotationSource, LibrarySource};
use crate::config::SecretString;
use crate::core::archive::{sanitize_file_stem, Archive, ArchiveBuilder};
use crate::core::guard::{RunGuards, RunKind, RunPermit};
use crate::core::progress::{ProgressEvent, ProgressSink};
use crate::domain::{
    Book, ExportOutcome, ExportedDocument, FailureReason, Library, Result, ToolboxError,
};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Orchestrator settings
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Extension of archived documents, without the dot
    pub document_extension: String,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            document_extension: "md".to_string(),
        }
    }
}

/// Result of a local export
#[derive(Debug)]
pub struct LocalExport {
    pub archive: Archive,
    pub summary: ExportSummary,
}

/// Result of [`BatchOrchestrator::dispatch`]
#[derive(Debug)]
pub enum RunResult {
    Local(LocalExport),
    Synced(ExportSummary),
}

impl RunResult {
    /// Summary of either kind of run
    pub fn summary(&self) -> &ExportSummary {
        match self {
            RunResult::Local(export) => &export.summary,
            RunResult::Synced(summary) => summary,
        }
    }
}

/// Drives export and sync runs over the whole library
pub struct BatchOrchestrator {
    library: Arc<dyn LibrarySource>,
    annotations: Arc<dyn AnnotationSource>,
    sync_target: Option<Arc<dyn SyncTarget>>,
    progress: Arc<dyn ProgressSink>,
    guards: RunGuards,
    shutdown: watch::Receiver<bool>,
    options: OrchestratorOptions,
}

impl BatchOrchestrator {
    /// Create a new orchestrator
    ///
    /// # Arguments
    ///
    /// * `library` - Lists the books to export
    /// * `annotations` - Renders one book's notes
    /// * `progress` - Receives progress events
    /// * `shutdown` - Checked between books; `true` stops the run
    pub fn new(
        library: Arc<dyn LibrarySource>,
        annotations: Arc<dyn AnnotationSource>,
        progress: Arc<dyn ProgressSink>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            library,
            annotations,
            sync_target: None,
            progress,
            guards: RunGuards::new(),
            shutdown,
            options: OrchestratorOptions::default(),
        }
    }

    /// Sets the target used by [`BatchOrchestrator::run_sync`]
    pub fn with_sync_target(mut self, target: Arc<dyn SyncTarget>) -> Self {
        self.sync_target = Some(target);
        self
    }

    /// Shares run guards with other orchestrators
    pub fn with_guards(mut self, guards: RunGuards) -> Self {
        self.guards = guards;
        self
    }

    /// Replaces the default options
    pub fn with_options(mut self, options: OrchestratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Run guards in use
    pub fn guards(&self) -> &RunGuards {
        &self.guards
    }

    /// Runs whichever mode the request asks for
    pub async fn dispatch(&self, request: ExportRequest) -> Result<RunResult> {
        match request {
            ExportRequest::Local => Ok(RunResult::Local(self.run_local_export().await?)),
            ExportRequest::Notion {
                database_url,
                notion_token,
            } => Ok(RunResult::Synced(
                self.run_sync(&database_url, &notion_token).await?,
            )),
        }
    }

    /// Exports every book with notes into a zip archive
    ///
    /// Fails only if the library cannot be fetched, the archive cannot be
    /// serialized or another local export is running. Interrupted runs
    /// still return the archive of the books processed so far.
    pub async fn run_local_export(&self) -> Result<LocalExport> {
        let kind = RunKind::Local;
        let key = kind.progress_key();
        let _permit = self.acquire(kind).await?;
        let start_time = Instant::now();

        tracing::info!("Starting local export");
        let library = self.fetch_library(kind).await?;
        let total = library.len();

        let mut summary = ExportSummary::new(total);
        let mut archive = ArchiveBuilder::new();

        for (index, book) in library.iter().enumerate() {
            if self.shutdown_requested() {
                tracing::warn!(remaining = total - index, "Shutdown requested, stopping export");
                summary.mark_interrupted(total - index);
                break;
            }

            self.emit(ProgressEvent::info(key, progress_body(index, total, &book.title)))
                .await;

            let outcome = match self.export_book(book).await {
                Ok(document) => self.archive_document(&mut archive, book, document),
                Err(reason) => {
                    log_failure(book, &reason);
                    ExportOutcome::Failed(reason)
                }
            };
            tracing::debug!(book_id = %book.id, outcome = outcome.label(), "Book processed");
            summary.record(book, outcome);
        }

        let archive = match archive.serialize() {
            Ok(archive) => archive,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize archive");
                self.emit(ProgressEvent::error(key, format!("Export failed: {e}")))
                    .await;
                return Err(e);
            }
        };

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary(kind.label());
        self.emit(terminal_event(kind, &summary)).await;

        Ok(LocalExport { archive, summary })
    }

    /// Pushes every book with notes to the sync target
    ///
    /// Both credentials are checked before anything touches the network;
    /// if either is blank the run emits one `Error` event and fails with
    /// [`ToolboxError::MissingCredentials`].
    pub async fn run_sync(
        &self,
        database_url: &str,
        access_token: &SecretString,
    ) -> Result<ExportSummary> {
        let kind = RunKind::Sync;
        let key = kind.progress_key();

        if database_url.trim().is_empty() || access_token.expose_secret().is_blank() {
            let e = ToolboxError::MissingCredentials(
                "set the Notion database link and token before syncing".to_string(),
            );
            tracing::error!(error = %e, "Sync not started");
            self.emit(ProgressEvent::error(key, e.to_string())).await;
            return Err(e);
        }

        let _permit = self.acquire(kind).await?;
        let start_time = Instant::now();

        let (target, credentials) = match self.prepare_sync(database_url, access_token).await {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!(error = %e, "Sync target not ready");
                self.emit(ProgressEvent::error(key, format!("Sync failed: {e}")))
                    .await;
                return Err(e);
            }
        };

        tracing::info!(database_id = %credentials.database_id, "Starting Notion sync");
        let library = self.fetch_library(kind).await?;
        let total = library.len();
        let mut summary = ExportSummary::new(total);

        for (index, book) in library.iter().enumerate() {
            if self.shutdown_requested() {
                tracing::warn!(remaining = total - index, "Shutdown requested, stopping sync");
                summary.mark_interrupted(total - index);
                break;
            }

            self.emit(ProgressEvent::info(key, progress_body(index, total, &book.title)))
                .await;

            let outcome = match self.sync_book(target.as_ref(), book, &credentials).await {
                Ok(outcome) => outcome,
                Err(reason) => {
                    log_failure(book, &reason);
                    ExportOutcome::Failed(reason)
                }
            };
            tracing::debug!(book_id = %book.id, outcome = outcome.label(), "Book processed");
            summary.record(book, outcome);
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary(kind.label());
        self.emit(terminal_event(kind, &summary)).await;

        Ok(summary)
    }

    async fn acquire(&self, kind: RunKind) -> Result<RunPermit> {
        match self.guards.try_acquire(kind) {
            Ok(permit) => Ok(permit),
            Err(e) => {
                tracing::warn!(run = kind.label(), "Run rejected, another one is active");
                self.emit(ProgressEvent::error(kind.progress_key(), e.to_string()))
                    .await;
                Err(e)
            }
        }
    }

    async fn fetch_library(&self, kind: RunKind) -> Result<Library> {
        match self.library.fetch_library().await {
            Ok(library) => {
                tracing::info!(books = library.len(), "Library fetched");
                Ok(library)
            }
            Err(e) => {
                let e = match e {
                    ToolboxError::LibraryFetch(_) => e,
                    other => ToolboxError::LibraryFetch(other.to_string()),
                };
                tracing::error!(error = %e, "Failed to fetch library");
                self.emit(ProgressEvent::error(
                    kind.progress_key(),
                    format!("{} failed: {e}", verb(kind)),
                ))
                .await;
                Err(e)
            }
        }
    }

    async fn prepare_sync(
        &self,
        database_url: &str,
        access_token: &SecretString,
    ) -> Result<(Arc<dyn SyncTarget>, SyncCredentials)> {
        let target = self.sync_target.clone().ok_or_else(|| {
            ToolboxError::Configuration("no sync target configured".to_string())
        })?;

        let database_id = resolve_database_id(database_url)?;
        let credentials = SyncCredentials::new(database_id, access_token.clone());
        target.prepare(&credentials).await?;

        Ok((target, credentials))
    }

    /// Step function: fetch and render one book
    async fn export_book(&self, book: &Book) -> std::result::Result<ExportedDocument, FailureReason> {
        self.annotations
            .export_book(book)
            .await
            .map_err(|e| FailureReason::fetch(e.to_string()).with_book_id(book.id.as_str()))
    }

    /// Step function: fetch one book and push it
    async fn sync_book(
        &self,
        target: &dyn SyncTarget,
        book: &Book,
        credentials: &SyncCredentials,
    ) -> std::result::Result<ExportOutcome, FailureReason> {
        let document = self.export_book(book).await?;
        if document.has_no_notes() {
            return Ok(ExportOutcome::Empty);
        }

        target
            .push(&document, credentials)
            .await
            .map_err(|e| FailureReason::sync(e.to_string()).with_book_id(book.id.as_str()))?;
        Ok(ExportOutcome::Exported)
    }

    fn archive_document(
        &self,
        archive: &mut ArchiveBuilder,
        book: &Book,
        document: ExportedDocument,
    ) -> ExportOutcome {
        if document.has_no_notes() {
            return ExportOutcome::Empty;
        }
        let Some(content) = document.content else {
            return ExportOutcome::Empty;
        };

        let name = self.entry_name(archive, book);
        archive.add(name, content);
        ExportOutcome::Exported
    }

    /// `{title}.{ext}`, or `{title}-{book id}.{ext}` if the name is taken,
    /// with a `-2`, `-3`, ... suffix while that is taken too
    fn entry_name(&self, archive: &ArchiveBuilder, book: &Book) -> String {
        let stem = sanitize_file_stem(&book.title, book.id.as_str());
        let extension = &self.options.document_extension;

        let name = format!("{stem}.{extension}");
        if !archive.contains(&name) {
            return name;
        }

        tracing::debug!(title = %book.title, book_id = %book.id, "Duplicate title in archive");
        let base = format!("{stem}-{}", book.id);
        let mut candidate = format!("{base}.{extension}");
        let mut suffix = 2usize;
        while archive.contains(&candidate) {
            candidate = format!("{base}-{suffix}.{extension}");
            suffix += 1;
        }
        candidate
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    async fn emit(&self, event: ProgressEvent) {
        let kind = event.kind;
        let delivery = self.progress.emit(event).await;
        tracing::trace!(kind = ?kind, delivery = ?delivery, "Progress event emitted");
    }
}

fn verb(kind: RunKind) -> &'static str {
    match kind {
        RunKind::Local => "Export",
        RunKind::Sync => "Sync",
    }
}

fn progress_body(index: usize, total: usize, title: &str) -> String {
    format!(
        "Exporting \u{300a}{title}\u{300b} ({} / {total}). Keep the process running until the export completes.",
        index + 1
    )
}

fn terminal_event(kind: RunKind, summary: &ExportSummary) -> ProgressEvent {
    let key = kind.progress_key();
    let verb = verb(kind);

    if summary.interrupted {
        return ProgressEvent::error(
            key,
            format!(
                "{verb} interrupted after {} of {} books: {} exported, {} without notes, {} failed, {} not processed.",
                summary.processed(),
                summary.total,
                summary.exported,
                summary.empty,
                summary.failed(),
                summary.not_processed
            ),
        );
    }

    ProgressEvent::success(
        key,
        format!(
            "{verb} finished: {} books processed, {} without notes, {} exported, {} failed.",
            summary.total,
            summary.empty,
            summary.exported,
            summary.failed()
        ),
    )
}

fn log_failure(book: &Book, reason: &FailureReason) {
    tracing::warn!(
        book_id = %book.id,
        title = %book.title,
        stage = reason.stage,
        error = %reason.message,
        "Book failed, continuing"
    );
}
