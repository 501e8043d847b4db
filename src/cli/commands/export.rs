//! Export command implementation
//!
//! This module implements the `export` command: every book on the shelf
//! with notes ends up as one Markdown file in a zip archive.

use crate::adapters::weread::WeReadClient;
use crate::cli::progress::{print_summary, spawn_console_presenter, summary_exit_code};
use crate::config::load_config;
use crate::core::export::{BatchOrchestrator, OrchestratorOptions};
use crate::core::progress::progress_channel;
use crate::domain::ToolboxError;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Directory to write the archive to (overrides export.output_dir)
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Some(dir) = &self.output_dir {
            tracing::info!(output_dir = %dir, "Overriding output directory from CLI");
            config.export.output_dir = dir.clone();
        }

        if !self.yes {
            println!("Export Configuration:");
            println!("  WeRead: {}", config.weread.base_url);
            println!("  Output directory: {}", config.export.output_dir);
            println!("  Document extension: .{}", config.export.document_extension);
            println!();
            print!("Export the notes of every book on your shelf? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(0);
            }
        }

        let client = match WeReadClient::new(&config.weread) {
            Ok(c) => Arc::new(c),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create WeRead client");
                eprintln!("Failed to initialize export: {e}");
                return Ok(2);
            }
        };

        let (progress, receiver) =
            progress_channel(Duration::from_millis(config.export.progress_ack_timeout_ms));
        let presenter = spawn_console_presenter(receiver);

        let orchestrator = BatchOrchestrator::new(
            client.clone(),
            client,
            Arc::new(progress),
            shutdown_signal,
        )
        .with_options(OrchestratorOptions {
            document_extension: config.export.document_extension.clone(),
        });

        println!("🚀 Starting export...");
        println!();

        let result = orchestrator.run_local_export().await;

        // Closing the channel lets the presenter finish
        drop(orchestrator);
        if let Err(e) = presenter.await {
            tracing::warn!(error = %e, "Progress presenter stopped unexpectedly");
        }

        let export = match result {
            Ok(export) => export,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(match e {
                    ToolboxError::Configuration(_) => 2,
                    _ => 5,
                });
            }
        };

        let path = match export.archive.write_to(&config.export.output_dir) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(error = %e, "Failed to write archive");
                eprintln!("Failed to write archive: {e}");
                return Ok(5);
            }
        };

        print_summary(&export.summary);
        println!("📦 Archive: {}", path.display());

        let exit_code = summary_exit_code(&export.summary);
        match exit_code {
            130 => println!("⚠️  Export interrupted, the archive holds the books processed so far."),
            1 => println!("⚠️  Export completed with failures"),
            _ => println!("✅ Export completed successfully!"),
        }

        Ok(exit_code)
    }
}
