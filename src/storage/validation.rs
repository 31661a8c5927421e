//! File name validation
//!
//! Every stored name must be a single flat path component inside the
//! storage directory.

use crate::error::StorageError;

/// Names starting with this marker are hidden from listings and word counts.
pub const HIDDEN_MARKER: char = '.';

/// Reserved prefix for in-flight temporary files.
pub const TEMP_FILE_PREFIX: &str = ".rax-tmp-";

/// Validate a client-supplied file name
pub fn validate_file_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() {
        return Err(StorageError::InvalidName("empty file name".into()));
    }

    if name == "." || name == ".." {
        return Err(StorageError::InvalidName(format!("'{name}' is reserved")));
    }

    if name.contains(['/', '\\']) {
        return Err(StorageError::InvalidName(format!(
            "'{name}' must not contain path separators"
        )));
    }

    if name.contains('\0') {
        return Err(StorageError::InvalidName("file name contains NUL".into()));
    }

    if is_temp_file(name) {
        return Err(StorageError::InvalidName(format!(
            "'{name}' uses the reserved prefix {TEMP_FILE_PREFIX}"
        )));
    }

    Ok(())
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_MARKER)
}

pub fn is_temp_file(name: &str) -> bool {
    name.starts_with(TEMP_FILE_PREFIX)
}
