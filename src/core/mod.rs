//! Core business logic for the toolbox.
//!
//! # Modules
//!
//! - [`export`] - Bulk export orchestration and summaries
//! - [`archive`] - In-memory zip archive of note documents
//! - [`progress`] - Progress channel between a run and its presenter
//! - [`guard`] - One active run per run kind
//! - [`retry`] - Request retries and bounded readiness polling
//!
//! # Export Workflow
//!
//! 1. **Fetch Library**: List every book on the WeRead shelf
//! 2. **Per Book**: Fetch annotations and render them to Markdown
//! 3. **Classify**: Exported, empty (no notes) or failed
//! 4. **Collect**: Add to the archive, or push to Notion
//! 5. **Report**: One progress event per book, then a final summary
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use weread_toolbox::adapters::weread::WeReadClient;
//! use weread_toolbox::config::load_config;
//! use weread_toolbox::core::export::BatchOrchestrator;
//! use weread_toolbox::core::progress::progress_channel;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("weread-toolbox.toml")?;
//! let client = Arc::new(WeReadClient::new(&config.weread)?);
//!
//! let (progress, _receiver) = progress_channel(Duration::from_millis(250));
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let orchestrator =
//!     BatchOrchestrator::new(client.clone(), client, Arc::new(progress), shutdown_rx);
//! let export = orchestrator.run_local_export().await?;
//!
//! println!("Exported: {}", export.summary.exported);
//! println!("Without notes: {}", export.summary.empty);
//! println!("Failed: {}", export.summary.failed_titles.len());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod export;
pub mod guard;
pub mod progress;
pub mod retry;
