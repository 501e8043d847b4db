//! Export summary and reporting
//!
//! Counts are updated once per book as the run progresses and frozen when
//! the run ends. [`ExportSummary::is_consistent`] checks that every book in
//! the library was accounted for exactly once.

use crate::domain::{Book, ExportOutcome, FailureReason};
use std::time::Duration;

/// Summary of one export or sync run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Number of books in the library
    pub total: usize,

    /// Books whose document was archived or synced
    pub exported: usize,

    /// Books without annotations
    pub empty: usize,

    /// Titles of books that failed, in library order
    pub failed_titles: Vec<String>,

    /// Failure details, parallel to `failed_titles`
    pub failures: Vec<FailureReason>,

    /// Books skipped because the run was interrupted
    pub not_processed: usize,

    /// Whether the run stopped early on a shutdown signal
    pub interrupted: bool,

    /// Wall time of the run
    pub duration: Duration,
}

impl ExportSummary {
    /// Creates an empty summary for a library of `total` books
    pub fn new(total: usize) -> Self {
        Self {
            total,
            exported: 0,
            empty: 0,
            failed_titles: Vec::new(),
            failures: Vec::new(),
            not_processed: 0,
            interrupted: false,
            duration: Duration::ZERO,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Accounts for one book
    pub fn record(&mut self, book: &Book, outcome: ExportOutcome) {
        match outcome {
            ExportOutcome::Exported => self.exported += 1,
            ExportOutcome::Empty => self.empty += 1,
            ExportOutcome::Failed(reason) => {
                self.failed_titles.push(book.title.clone());
                self.failures.push(reason);
            }
        }
    }

    /// Marks the run as interrupted with `remaining` books never visited
    pub fn mark_interrupted(&mut self, remaining: usize) {
        self.interrupted = true;
        self.not_processed = remaining;
    }

    /// Number of failed books
    pub fn failed(&self) -> usize {
        self.failed_titles.len()
    }

    /// Number of books that were visited
    pub fn processed(&self) -> usize {
        self.exported + self.empty + self.failed()
    }

    /// Whether any book failed
    pub fn has_failures(&self) -> bool {
        !self.failed_titles.is_empty()
    }

    /// Every book is counted exactly once
    pub fn is_consistent(&self) -> bool {
        self.processed() + self.not_processed == self.total
            && (self.interrupted || self.not_processed == 0)
    }

    /// Log the summary
    pub fn log_summary(&self, run: &str) {
        tracing::info!(
            run = run,
            total = self.total,
            exported = self.exported,
            empty = self.empty,
            failed = self.failed(),
            not_processed = self.not_processed,
            interrupted = self.interrupted,
            duration_ms = self.duration.as_millis() as u64,
            "Run completed"
        );

        for (title, reason) in self.failed_titles.iter().zip(&self.failures) {
            tracing::warn!(
                run = run,
                title = %title,
                book_id = reason.book_id.as_deref().unwrap_or("-"),
                stage = reason.stage,
                error = %reason.message,
                "Book failed"
            );
        }

        if !self.is_consistent() {
            tracing::error!(
                run = run,
                total = self.total,
                processed = self.processed(),
                not_processed = self.not_processed,
                "Summary counts do not add up"
            );
        }
    }
}
