//! In-memory zip archive of note documents
//!
//! One [`ArchiveBuilder`] belongs to exactly one export run. Documents are
//! keyed by entry name (last write wins) and serialized in name order with a
//! fixed entry timestamp, so the same set of additions always produces the
//! same bytes. Serialization consumes the builder.

use crate::domain::{Result, ToolboxError};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Prefix of every archive file name
pub const ARCHIVE_PREFIX: &str = "weread-toolbox-export";

/// Accumulates named documents for a single archive
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    entries: BTreeMap<String, String>,
}

impl ArchiveBuilder {
    /// Creates an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a document; replaces any earlier document with the same name
    pub fn add(&mut self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        if self.entries.insert(name.clone(), content.into()).is_some() {
            tracing::debug!(entry = %name, "Replaced archive entry");
        }
    }

    /// Whether an entry with this name was already added
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries were added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes all entries into zip bytes
    pub fn serialize(self) -> Result<Archive> {
        let entry_count = self.entries.len();
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(0o644);

        for (name, content) in &self.entries {
            writer.start_file(name.as_str(), options)?;
            writer
                .write_all(content.as_bytes())
                .map_err(|e| ToolboxError::Archive(format!("Failed to write {name}: {e}")))?;
        }

        let bytes = writer.finish()?.into_inner();
        tracing::debug!(
            entries = entry_count,
            size_bytes = bytes.len(),
            "Serialized archive"
        );

        Ok(Archive {
            bytes,
            entry_count,
            created_at: Local::now(),
        })
    }
}

/// A serialized archive, owned by whoever ran the export
#[derive(Debug, Clone)]
pub struct Archive {
    bytes: Vec<u8>,
    entry_count: usize,
    created_at: DateTime<Local>,
}

impl Archive {
    /// Zip bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the archive, returning the zip bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of documents inside
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Download file name, stamped with the serialization time
    pub fn file_name(&self) -> String {
        archive_file_name(&self.created_at)
    }

    /// Writes the archive into `dir` under [`Archive::file_name`]
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, &self.bytes).map_err(|e| {
            ToolboxError::Io(format!("Failed to write archive {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), entries = self.entry_count, "Archive written");
        Ok(path)
    }
}

/// `weread-toolbox-export-{YYYYMMDDHHMMSS}.zip`
pub fn archive_file_name(timestamp: &DateTime<Local>) -> String {
    format!("{ARCHIVE_PREFIX}-{}.zip", timestamp.format("%Y%m%d%H%M%S"))
}

/// Turns a book title into a file name stem
///
/// Path separators, characters Windows refuses and control characters
/// become `_`; surrounding whitespace and dots are trimmed. An empty result
/// falls back to `fallback` (the book id).
pub fn sanitize_file_stem(title: &str, fallback: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c.is_whitespace() || c == '.');
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
