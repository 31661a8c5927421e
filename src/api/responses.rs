//! Wire types
//!
//! Request query parameters and JSON response bodies. Field names are part
//! of the client contract and must not change.

use serde::{Deserialize, Serialize};

use crate::storage::StoredEntry;

pub const WELCOME_MESSAGE: &str = "Welcome to the File Store!";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";
pub const NO_FILES_MESSAGE: &str = "No files found.";

/// Multipart field carrying each file of an upload batch
pub const UPLOAD_FIELD: &str = "files";
/// Multipart field carrying the new content of an update
pub const UPDATE_FIELD: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Per-file outcome of an upload batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub file: String,
    pub message: String,
}

/// Listing result. The empty case carries a message instead of `files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse {
    Files { files: Vec<StoredEntry> },
    Empty { message: String },
}

impl ListResponse {
    pub fn is_empty(&self) -> bool {
        matches!(self, ListResponse::Empty { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCountResponse {
    pub total_word_count: u64,
}

/// Ranked words, serialized as `[[word, count], ...]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequentWordsResponse {
    pub words: Vec<(String, u64)>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileNameQuery {
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrequentWordsQuery {
    /// Kept as text so values beyond the i64 range can be clamped
    pub n: Option<String>,
    pub order: Option<String>,
}
