//! Typed trigger messages for export runs
//!
//! ```rust
//! use weread_toolbox::core::export::ExportRequest;
//!
//! let request: ExportRequest = serde_json::from_str(
//!     r#"{"type":"exportAllToNotion","databaseUrl":"https://www.notion.so/x","notionToken":"secret_1"}"#,
//! )
//! .unwrap();
//! assert!(matches!(request, ExportRequest::Notion { .. }));
//! ```

use crate::config::{secret_string, SecretString};
use serde::{Deserialize, Serialize};

/// A request to start a bulk run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExportRequest {
    /// Build a local archive
    #[serde(rename = "exportAllToLocal")]
    Local,

    /// Sync every book to a Notion database
    ///
    /// Missing fields deserialize as empty strings so the run itself reports
    /// the missing credentials.
    #[serde(rename = "exportAllToNotion", rename_all = "camelCase")]
    Notion {
        #[serde(default)]
        database_url: String,
        #[serde(default = "empty_token")]
        notion_token: SecretString,
    },
}

fn empty_token() -> SecretString {
    secret_string(String::new())
}
