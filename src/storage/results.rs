//! Storage result types
//!
//! Defines result structures returned by storage operations.

use serde::{Deserialize, Serialize};

/// One stored file as reported by a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub name: String,
    pub size: u64,
}

/// Result of an overwrite operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteOutcome {
    Created,
    Replaced,
}
