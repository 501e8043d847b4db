//! Remembered Notion credentials
//!
//! The sync form is prefilled from, and optionally saved back to, a small
//! JSON document holding the two keys `databaseUrl` and `notionToken`.
//! Storage sits behind [`CredentialStore`] so the command layer can be given
//! any backend; the export orchestrator never touches it and only receives
//! the values as call parameters.

use super::SecretString;
use crate::domain::{Result, ToolboxError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The two persisted keys
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredentials {
    /// Notion database link or id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// Notion integration token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notion_token: Option<SecretString>,
}

/// Read/write access to remembered credentials
pub trait CredentialStore: Send + Sync {
    /// Loads the stored credentials; missing storage yields empty credentials
    fn load(&self) -> Result<StoredCredentials>;

    /// Replaces the stored credentials
    fn save(&self, credentials: &StoredCredentials) -> Result<()>;
}

/// JSON file backed credential store
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store for the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<StoredCredentials> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No stored credentials");
            return Ok(StoredCredentials::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            ToolboxError::Io(format!(
                "Failed to read credentials {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(credentials)?;
        fs::write(&self.path, json).map_err(|e| {
            ToolboxError::Io(format!(
                "Failed to write credentials {}: {e}",
                self.path.display()
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        tracing::info!(path = %self.path.display(), "Saved Notion credentials");
        Ok(())
    }
}
