//! Domain identifier types with validation
//!
//! Newtype wrappers keep WeRead book ids and Notion database ids apart.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// WeRead book identifier
///
/// # Examples
///
/// ```
/// use weread_toolbox::domain::ids::BookId;
/// use std::str::FromStr;
///
/// let book_id = BookId::from_str("3300064831").unwrap();
/// assert_eq!(book_id.as_str(), "3300064831");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Creates a new BookId, rejecting blank input
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Book ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the book id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for BookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Notion database identifier
///
/// Always stored as 32 lowercase hex characters without dashes. Accepts a
/// raw id, a dashed UUID, or a full database link as copied from the Notion
/// app (`https://www.notion.so/workspace/Reading-Notes-<id>?v=<view>`).
///
/// # Examples
///
/// ```
/// use weread_toolbox::domain::ids::DatabaseId;
///
/// let id = DatabaseId::parse(
///     "https://www.notion.so/me/Books-0123456789abcdef0123456789abcdef?v=ffff",
/// ).unwrap();
/// assert_eq!(id.as_str(), "0123456789abcdef0123456789abcdef");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatabaseId(String);

impl DatabaseId {
    /// Parses a database id out of an id or a database link
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err("Database ID cannot be empty".to_string());
        }

        let candidate = match Url::parse(input) {
            Ok(url) => url
                .path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
                .map(str::to_string)
                .ok_or_else(|| format!("No database id in link: {input}"))?,
            Err(_) => input.to_string(),
        };

        let compact: Vec<char> = candidate.chars().filter(|c| *c != '-').collect();
        if compact.len() < 32 {
            return Err(format!("No 32-character database id in: {input}"));
        }

        // Links carry the page title before the id: "Reading-Notes-<id>"
        let tail: String = compact[compact.len() - 32..].iter().collect();
        if !tail.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Database id is not hexadecimal: {tail}"));
        }

        Ok(Self(tail.to_ascii_lowercase()))
    }

    /// Returns the database id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DatabaseId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
