//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ToolboxConfig;
use super::secret_string;
use crate::domain::errors::ToolboxError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ToolboxConfig
/// 4. Applies environment variable overrides (TOOLBOX_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced environment
/// variable is missing, parsing fails, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use weread_toolbox::config::loader::load_config;
///
/// let config = load_config("weread-toolbox.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ToolboxConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ToolboxError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ToolboxError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Same pipeline as [`load_config`] minus the file read.
pub fn parse_config(contents: &str) -> Result<ToolboxConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ToolboxConfig = toml::from_str(&contents)
        .map_err(|e| ToolboxError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ToolboxError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ToolboxError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ToolboxError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the TOOLBOX_* prefix
///
/// Variables follow the pattern TOOLBOX_<SECTION>_<KEY>, for example
/// TOOLBOX_WEREAD_COOKIE or TOOLBOX_EXPORT_OUTPUT_DIR. Unparseable numeric
/// values are ignored.
fn apply_env_overrides(config: &mut ToolboxConfig) {
    if let Ok(val) = std::env::var("TOOLBOX_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // WeRead overrides
    if let Ok(val) = std::env::var("TOOLBOX_WEREAD_BASE_URL") {
        config.weread.base_url = val;
    }
    if let Ok(val) = std::env::var("TOOLBOX_WEREAD_COOKIE") {
        config.weread.cookie = secret_string(val);
    }
    if let Ok(val) = std::env::var("TOOLBOX_WEREAD_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.weread.timeout_seconds = secs;
        }
    }

    // Export overrides
    if let Ok(val) = std::env::var("TOOLBOX_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("TOOLBOX_EXPORT_DOCUMENT_EXTENSION") {
        config.export.document_extension = val;
    }

    // Notion overrides
    if let Ok(val) = std::env::var("TOOLBOX_NOTION_API_BASE_URL") {
        config.notion.api_base_url = val;
    }
    if let Ok(val) = std::env::var("TOOLBOX_NOTION_TITLE_PROPERTY") {
        config.notion.title_property = val;
    }
    if let Ok(val) = std::env::var("TOOLBOX_NOTION_CREDENTIALS_PATH") {
        config.notion.credentials_path = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("TOOLBOX_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("TOOLBOX_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
