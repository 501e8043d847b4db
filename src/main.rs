// WeRead Toolbox - bulk export of WeRead notes
// Copyright (c) 2025 WeRead Toolbox Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use tokio::sync::watch;
use weread_toolbox::cli::{Cli, Commands};
use weread_toolbox::config::{load_config, LoggingConfig};
use weread_toolbox::logging::init_logging;

#[tokio::main]
async fn main() {
    // Optional: a missing .env is silently ignored
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The config file may be missing or broken here; the command reports that
    // itself, logging just falls back to console only.
    let (config_level, logging_config) = match load_config(&cli.config) {
        Ok(config) => (Some(config.application.log_level), config.logging),
        Err(_) => (None, LoggingConfig::default()),
    };
    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "WeRead Toolbox - bulk export of WeRead notes"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create SIGTERM handler");
                    if tokio::signal::ctrl_c().await.is_ok() {
                        request_shutdown(&shutdown_tx, "SIGINT");
                    }
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => request_shutdown(&shutdown_tx, "SIGINT"),
                _ = sigterm.recv() => request_shutdown(&shutdown_tx, "SIGTERM"),
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                request_shutdown(&shutdown_tx, "SIGINT");
            }
        }
    });

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors, flush file logs first
    drop(logging_guard);
    process::exit(exit_code);
}

fn request_shutdown(shutdown_tx: &watch::Sender<bool>, signal: &str) {
    tracing::info!(signal, "Shutdown requested, finishing the current book");
    println!("\n⚠️  Shutdown signal received, finishing the current book...");
    let _ = shutdown_tx.send(true);
}

async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Export(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::Sync(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
