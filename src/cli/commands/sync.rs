//! Sync command implementation
//!
//! Pushes every book with notes to a Notion database. The database link
//! and token come from the command line, falling back to the remembered
//! credentials file; `--remember` saves the values that were used.

use crate::adapters::notion::NotionClient;
use crate::adapters::weread::WeReadClient;
use crate::cli::progress::{print_summary, spawn_console_presenter, summary_exit_code};
use crate::config::{
    load_config, secret_string, CredentialStore, FileCredentialStore, StoredCredentials,
};
use crate::core::export::BatchOrchestrator;
use crate::core::progress::progress_channel;
use crate::domain::ToolboxError;
use clap::Args;
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Notion database link or id
    #[arg(long)]
    pub database_url: Option<String>,

    /// Notion integration token
    #[arg(long, env = "TOOLBOX_NOTION_TOKEN", hide_env_values = true)]
    pub notion_token: Option<String>,

    /// Save the database link and token for later runs
    #[arg(long)]
    pub remember: bool,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let store = FileCredentialStore::new(&config.notion.credentials_path);
        let stored = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring unreadable credentials file");
            StoredCredentials::default()
        });
        let credentials = self.merge(stored);

        if self.remember {
            match store.save(&credentials) {
                Ok(()) => println!("🔐 Credentials saved to {}", store.path().display()),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to save credentials");
                    eprintln!("Failed to save credentials: {e}");
                }
            }
        }

        let database_url = credentials.database_url.unwrap_or_default();
        let token = credentials
            .notion_token
            .unwrap_or_else(|| secret_string(String::new()));

        let (weread, notion) = match (
            WeReadClient::new(&config.weread),
            NotionClient::new(&config.notion),
        ) {
            (Ok(w), Ok(n)) => (Arc::new(w), Arc::new(n)),
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!(error = %e, "Failed to create HTTP clients");
                eprintln!("Failed to initialize sync: {e}");
                return Ok(2);
            }
        };

        let (progress, receiver) =
            progress_channel(Duration::from_millis(config.export.progress_ack_timeout_ms));
        let presenter = spawn_console_presenter(receiver);

        let orchestrator =
            BatchOrchestrator::new(weread.clone(), weread, Arc::new(progress), shutdown_signal)
                .with_sync_target(notion);

        println!("🚀 Starting Notion sync...");
        println!();

        let result = orchestrator.run_sync(&database_url, &token).await;

        drop(orchestrator);
        if let Err(e) = presenter.await {
            tracing::warn!(error = %e, "Progress presenter stopped unexpectedly");
        }

        let summary = match result {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(error = %e, "Sync failed");
                eprintln!("Sync failed: {e}");
                return Ok(match e {
                    ToolboxError::MissingCredentials(_) | ToolboxError::Configuration(_) => 2,
                    _ => 5,
                });
            }
        };

        print_summary(&summary);
        let exit_code = summary_exit_code(&summary);
        match exit_code {
            130 => println!("⚠️  Sync interrupted, books already synced are kept."),
            1 => println!("⚠️  Sync completed with failures"),
            _ => println!("✅ Sync completed successfully!"),
        }

        Ok(exit_code)
    }

    /// Command line values win over remembered ones
    fn merge(&self, stored: StoredCredentials) -> StoredCredentials {
        let database_url = self
            .database_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or(stored.database_url);
        let notion_token = self
            .notion_token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .map(secret_string)
            .or(stored.notion_token);

        tracing::debug!(
            has_database_url = database_url.is_some(),
            has_token = notion_token
                .as_ref()
                .map(|t| !t.expose_secret().is_blank())
                .unwrap_or(false),
            "Resolved Notion credentials"
        );

        StoredCredentials {
            database_url,
            notion_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(database_url: Option<&str>, token: Option<&str>) -> SyncArgs {
        SyncArgs {
            database_url: database_url.map(str::to_string),
            notion_token: token.map(str::to_string),
            remember: false,
        }
    }

    #[test]
    fn test_merge_prefers_command_line() {
        let stored = StoredCredentials {
            database_url: Some("stored-db".to_string()),
            notion_token: Some(secret_string("stored-token".to_string())),
        };

        let merged = args(Some("cli-db"), None).merge(stored);
        assert_eq!(merged.database_url.as_deref(), Some("cli-db"));
        assert_eq!(
            merged.notion_token.unwrap().expose_secret().as_str(),
            "stored-token"
        );
    }

    #[test]
    fn test_merge_ignores_blank_arguments() {
        let stored = StoredCredentials {
            database_url: Some("stored-db".to_string()),
            notion_token: None,
        };

        let merged = args(Some("  "), Some("")).merge(stored);
        assert_eq!(merged.database_url.as_deref(), Some("stored-db"));
        assert!(merged.notion_token.is_none());
    }
}
