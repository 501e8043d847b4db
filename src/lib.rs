// WeRead Toolbox - bulk export of WeRead notes
// Copyright (c) 2025 WeRead Toolbox Contributors
// Licensed under the MIT License

//! # WeRead Toolbox
//!
//! Bulk export of WeRead reading notes. Every book on the shelf is turned
//! into one Markdown document, and the whole batch goes either into a local
//! zip archive or into a Notion database.
//!
//! ## Overview
//!
//! - **Local export** collects one `<title>.md` per book with notes and
//!   packages them as `weread-toolbox-export-<timestamp>.zip`
//! - **Notion sync** waits for the target database to become reachable and
//!   then pushes each book as a page
//! - A failing book never stops the batch; it is counted and reported in
//!   the run summary
//! - Progress is reported as a stream of events that a presenter
//!   acknowledges, and a run never blocks on a missing presenter
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and console presenter
//! - [`core`] - Orchestration, archive building, progress channel, run guards
//! - [`adapters`] - WeRead and Notion HTTP clients
//! - [`domain`] - Books, exported documents, outcomes and errors
//! - [`config`] - Configuration and remembered credentials
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio::sync::watch;
//! use weread_toolbox::adapters::weread::WeReadClient;
//! use weread_toolbox::config::load_config;
//! use weread_toolbox::core::export::BatchOrchestrator;
//! use weread_toolbox::core::progress::progress_channel;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("weread-toolbox.toml")?;
//!     let client = Arc::new(WeReadClient::new(&config.weread)?);
//!
//!     let (progress, _receiver) = progress_channel(Duration::from_millis(250));
//!     let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//!
//!     let orchestrator =
//!         BatchOrchestrator::new(client.clone(), client, Arc::new(progress), shutdown_rx);
//!     let export = orchestrator.run_local_export().await?;
//!
//!     let path = export.archive.write_to(&config.export.output_dir)?;
//!     println!(
//!         "{} of {} books exported to {}",
//!         export.summary.exported,
//!         export.summary.total,
//!         path.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::Result`], with
//! [`domain::ToolboxError`] as the error type. Per-book failures are not
//! errors of the run; they end up in [`core::export::ExportSummary`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
