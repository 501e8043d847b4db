//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the toolbox configuration file.

use crate::config::load_config;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config already runs validation
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  WeRead: {}", config.weread.base_url);
        println!(
            "  WeRead Cookie: {}",
            if config.weread.cookie.expose_secret().is_blank() {
                "(not set)"
            } else {
                "***"
            }
        );
        println!("  Output Directory: {}", config.export.output_dir);
        println!("  Document Extension: .{}", config.export.document_extension);
        println!("  Notion API: {}", config.notion.api_base_url);
        println!("  Notion Title Property: {}", config.notion.title_property);
        println!("  Notion Credentials: {}", config.notion.credentials_path);
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_missing_file_is_config_error() {
        let code = ValidateArgs {}
            .execute("/nonexistent/weread-toolbox.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[weread]\ncookie = \"wr_skey=abc\"").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }
}
