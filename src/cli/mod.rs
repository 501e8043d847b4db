//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;
pub mod progress;

use clap::{Parser, Subcommand};

/// WeRead Toolbox - bulk export of WeRead notes
#[derive(Parser, Debug)]
#[command(name = "weread-toolbox")]
#[command(version, about, long_about = None)]
#[command(author = "WeRead Toolbox Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "weread-toolbox.toml", env = "TOOLBOX_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TOOLBOX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the notes of every book into a local zip archive
    Export(commands::export::ExportArgs),

    /// Sync the notes of every book to a Notion database
    Sync(commands::sync::SyncArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
