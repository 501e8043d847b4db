//! Notion REST API client

use super::blocks::{markdown_to_blocks, rich_text, MAX_BLOCKS_PER_REQUEST};
use super::{SyncCredentials, SyncTarget};
use crate::config::NotionConfig;
use crate::core::retry::{poll_until, RetryPolicy};
use crate::domain::{DatabaseId, ExportedDocument, NotionError, Result, ToolboxError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method};
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP client for the Notion API
pub struct NotionClient {
    base_url: String,
    api_version: String,
    title_property: String,
    client: Client,
    retry: RetryPolicy,
    readiness_interval: Duration,
    readiness_max_attempts: u32,
}

impl NotionClient {
    /// Create a new client from configuration
    pub fn new(config: &NotionConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                ToolboxError::Configuration(format!("Failed to build Notion HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            title_property: config.title_property.clone(),
            client,
            retry: RetryPolicy::from_config(&config.retry),
            readiness_interval: Duration::from_millis(config.readiness_interval_ms),
            readiness_max_attempts: config.readiness_max_attempts,
        })
    }

    /// Fetches the database object
    pub async fn retrieve_database(&self, credentials: &SyncCredentials) -> Result<Value> {
        let path = format!("/v1/databases/{}", credentials.database_id);
        self.request("retrieve database", Method::GET, &path, credentials, None)
            .await
    }

    /// Ids of live pages whose title equals `title`
    pub async fn find_pages_by_title(
        &self,
        credentials: &SyncCredentials,
        title: &str,
    ) -> Result<Vec<String>> {
        let path = format!("/v1/databases/{}/query", credentials.database_id);
        let mut page_ids = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({
                "filter": {
                    "property": self.title_property,
                    "title": { "equals": title }
                },
                "page_size": 100
            });
            if let Some(cursor) = &cursor {
                body["start_cursor"] = json!(cursor);
            }

            let response = self
                .request("query database", Method::POST, &path, credentials, Some(body))
                .await?;

            let results = response["results"].as_array().ok_or_else(|| {
                NotionError::InvalidResponse("query response without results".to_string())
            })?;
            page_ids.extend(
                results
                    .iter()
                    .filter_map(|page| page["id"].as_str())
                    .map(str::to_string),
            );

            match response["next_cursor"].as_str() {
                Some(next) if response["has_more"].as_bool() == Some(true) => {
                    cursor = Some(next.to_string());
                }
                _ => break,
            }
        }

        Ok(page_ids)
    }

    /// Moves a page to the trash
    pub async fn archive_page(&self, credentials: &SyncCredentials, page_id: &str) -> Result<()> {
        let path = format!("/v1/pages/{page_id}");
        self.request(
            "archive page",
            Method::PATCH,
            &path,
            credentials,
            Some(json!({ "archived": true })),
        )
        .await?;
        Ok(())
    }

    /// Creates a page in the database and returns its id
    pub async fn create_page(
        &self,
        credentials: &SyncCredentials,
        title: &str,
        children: &[Value],
    ) -> Result<String> {
        let mut properties = serde_json::Map::new();
        properties.insert(
            self.title_property.clone(),
            json!({ "title": rich_text(title) }),
        );

        let body = json!({
            "parent": { "database_id": credentials.database_id.as_str() },
            "properties": properties,
            "children": children,
        });

        let response = self
            .request("create page", Method::POST, "/v1/pages", credentials, Some(body))
            .await?;

        response["id"].as_str().map(str::to_string).ok_or_else(|| {
            NotionError::InvalidResponse("created page has no id".to_string()).into()
        })
    }

    /// Appends children to a block or page
    pub async fn append_blocks(
        &self,
        credentials: &SyncCredentials,
        block_id: &str,
        children: &[Value],
    ) -> Result<()> {
        let path = format!("/v1/blocks/{block_id}/children");
        self.request(
            "append blocks",
            Method::PATCH,
            &path,
            credentials,
            Some(json!({ "children": children })),
        )
        .await?;
        Ok(())
    }

    async fn request(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        credentials: &SyncCredentials,
        body: Option<Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        self.retry
            .run(operation, || async {
                let mut request = self
                    .client
                    .request(method.clone(), &url)
                    .bearer_auth(credentials.token.expose_secret().as_str())
                    .header("Notion-Version", &self.api_version);
                if let Some(body) = &body {
                    request = request.json(body);
                }

                let response = request.send().await.map_err(|e| {
                    if e.is_timeout() {
                        NotionError::Timeout(e.to_string())
                    } else {
                        NotionError::ConnectionFailed(e.to_string())
                    }
                })?;

                let status = response.status();
                let text = response
                    .text()
                    .await
                    .map_err(|e| NotionError::InvalidResponse(e.to_string()))?;

                if !status.is_success() {
                    return Err(status_error(status.as_u16(), &text).into());
                }

                serde_json::from_str::<Value>(&text).map_err(|e| {
                    ToolboxError::from(NotionError::InvalidResponse(format!("{operation}: {e}")))
                })
            })
            .await
    }
}

fn status_error(status: u16, body: &str) -> NotionError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string());

    match status {
        401 => NotionError::Unauthorized(message),
        404 => NotionError::NotFound(message),
        429 => NotionError::RateLimited(message),
        _ => NotionError::Status { status, message },
    }
}

#[async_trait]
impl SyncTarget for NotionClient {
    async fn prepare(&self, credentials: &SyncCredentials) -> Result<()> {
        poll_until(
            "notion database",
            self.readiness_interval,
            self.readiness_max_attempts,
            || async {
                match self.retrieve_database(credentials).await {
                    Ok(_) => Ok(Some(())),
                    // Not shared with the integration yet
                    Err(ToolboxError::Notion(NotionError::NotFound(_))) => Ok(None),
                    Err(e) => Err(e),
                }
            },
        )
        .await?;

        tracing::info!(database_id = %credentials.database_id, "Notion database reachable");
        Ok(())
    }

    async fn push(&self, document: &ExportedDocument, credentials: &SyncCredentials) -> Result<()> {
        let content = document.content.as_deref().unwrap_or_default();
        let blocks = markdown_to_blocks(content, &document.title);

        let existing = self.find_pages_by_title(credentials, &document.title).await?;

        // Previous pages stay live until the replacement is complete
        let mut batches = blocks.chunks(MAX_BLOCKS_PER_REQUEST);
        let first = batches.next().unwrap_or(&[]);
        let page_id = self
            .create_page(credentials, &document.title, first)
            .await?;

        for batch in batches {
            self.append_blocks(credentials, &page_id, batch).await?;
        }

        let stale: Vec<&String> = existing.iter().filter(|id| **id != page_id).collect();
        for old_id in &stale {
            self.archive_page(credentials, old_id).await?;
        }
        if !stale.is_empty() {
            tracing::debug!(
                title = %document.title,
                replaced = stale.len(),
                "Archived previous pages"
            );
        }

        tracing::debug!(
            title = %document.title,
            page_id = %page_id,
            blocks = blocks.len(),
            "Synced page"
        );
        Ok(())
    }
}

/// Resolves a user-supplied database link into credentials
pub fn resolve_database_id(database_url: &str) -> Result<DatabaseId> {
    DatabaseId::parse(database_url)
        .map_err(|e| NotionError::InvalidDatabaseLink(e).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mapping() {
        let body = r#"{"object":"error","status":401,"code":"unauthorized","message":"API token is invalid."}"#;
        assert!(matches!(
            status_error(401, body),
            NotionError::Unauthorized(m) if m == "API token is invalid."
        ));
        assert!(matches!(status_error(404, "{}"), NotionError::NotFound(_)));
        assert!(matches!(status_error(429, ""), NotionError::RateLimited(_)));
        assert!(matches!(
            status_error(502, "bad gateway"),
            NotionError::Status { status: 502, .. }
        ));
    }

    #[test]
    fn test_resolve_database_id() {
        assert!(resolve_database_id("not a database").is_err());
        let id = resolve_database_id("0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(id.as_str(), "0123456789abcdef0123456789abcdef");
    }
}
