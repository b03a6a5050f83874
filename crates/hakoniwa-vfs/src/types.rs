//! Core VFS types shared by every backend.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// File type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

impl FileType {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }
}

/// Directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Entry type.
    pub kind: FileType,
}

impl DirEntry {
    /// Create a new directory entry.
    pub fn new(name: impl Into<String>, kind: FileType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a file entry.
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, FileType::File)
    }

    /// Create a directory entry.
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, FileType::Directory)
    }
}

/// File content.
///
/// Bytes that are not valid UTF-8 are kept as base64 text and tagged
/// `Binary`, so a reader can always tell which representation it got.
/// Raw bytes are not recoverable without decoding the base64 again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Content {
    /// Decoded UTF-8 text.
    Text(String),
    /// Base64 encoding of bytes that failed UTF-8 decoding.
    Binary(String),
}

impl Content {
    /// Decode bytes as UTF-8, falling back to tagged base64.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Content::Text(text),
            Err(e) => Content::Binary(STANDARD.encode(e.as_bytes())),
        }
    }

    /// The stored text, whichever representation it is.
    pub fn as_str(&self) -> &str {
        match self {
            Content::Text(s) | Content::Binary(s) => s,
        }
    }

    /// Returns true if the content originated from non-UTF-8 bytes.
    pub fn is_binary(&self) -> bool {
        matches!(self, Content::Binary(_))
    }
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::Text(s.to_string())
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Text(s)
    }
}

/// Successful outcome of `create_file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Touched {
    /// A new file was inserted.
    Created,
    /// An existing file had its `modified` timestamp bumped.
    TimestampUpdated,
    /// An existing file was left alone; its timestamps are reported.
    Times {
        created: DateTime<Utc>,
        modified: DateTime<Utc>,
    },
}

impl fmt::Display for Touched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Touched::Created => f.write_str("file created"),
            Touched::TimestampUpdated => f.write_str("timestamp updated"),
            Touched::Times { created, modified } => write!(
                f,
                "created: {}, modified: {}",
                created.with_timezone(&Local).to_rfc3339(),
                modified.with_timezone(&Local).to_rfc3339()
            ),
        }
    }
}
