//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "weread-toolbox.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing WeRead Toolbox configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Copy the cookie of a logged-in weread.qq.com session");
                println!("  2. Put it in a .env file as WEREAD_COOKIE=...");
                println!("  3. Validate configuration: weread-toolbox validate-config");
                println!("  4. Export to a zip archive: weread-toolbox export");
                println!("  5. Or sync to Notion: weread-toolbox sync --database-url <link> --notion-token <token>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# WeRead Toolbox Configuration File

[application]
log_level = "info"

[weread]
base_url = "https://weread.qq.com"
cookie = "${WEREAD_COOKIE}"

[export]
output_dir = "."
document_extension = "md"

[notion]
title_property = "Name"
credentials_path = "weread-credentials.json"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# WeRead Toolbox Configuration File
#
# Values of the form ${VAR} are substituted from the environment, and any
# key can be overridden with TOOLBOX_<SECTION>_<KEY>.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# WeRead
# ============================================================================
[weread]
# Base URL of the WeRead web API
base_url = "https://weread.qq.com"

# Session cookie of a logged-in browser (keep it in .env)
cookie = "${WEREAD_COOKIE}"

# Request timeout in seconds
timeout_seconds = 30

[weread.retry]
max_retries = 3
initial_delay_ms = 500
max_delay_ms = 10000
backoff_multiplier = 2.0

# ============================================================================
# Local export
# ============================================================================
[export]
# Directory the weread-toolbox-export-<timestamp>.zip archive is written to
output_dir = "."

# Extension of each note document inside the archive
document_extension = "md"

# How long a progress event waits for the console to acknowledge it
progress_ack_timeout_ms = 250

# ============================================================================
# Notion sync
# ============================================================================
[notion]
api_base_url = "https://api.notion.com"
api_version = "2022-06-28"

# Title property of the target database
title_property = "Name"

# Where `sync --remember` stores the database link and token
credentials_path = "weread-credentials.json"

# Readiness polling before the first page is written
readiness_interval_ms = 200
readiness_max_attempts = 50

timeout_seconds = 30

[notion.retry]
max_retries = 3
initial_delay_ms = 500
max_delay_ms = 10000
backoff_multiplier = 2.0

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files next to the console output
local_enabled = false
local_path = "logs"

# Rotation: daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}
