//! Error handlers
//!
//! Maps server errors onto HTTP status codes and logs them.

use crate::error::types::{FileStoreError, StorageError};
use axum::http::StatusCode;
use log::{error, warn};

/// Log a server error at a level matching its severity
pub fn handle_error(err: &FileStoreError) {
    match error_to_status_code(err) {
        code if code.is_server_error() => error!("File Store Error: {}", err),
        _ => warn!("Request rejected: {}", err),
    }
}

/// Convert error to HTTP status code
///
/// Conflicts stay on 400 for compatibility with existing clients.
pub fn error_to_status_code(err: &FileStoreError) -> StatusCode {
    match err {
        FileStoreError::Storage(StorageError::AlreadyExists(_)) => StatusCode::BAD_REQUEST,
        FileStoreError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
        FileStoreError::Storage(StorageError::InvalidName(_)) => StatusCode::BAD_REQUEST,
        FileStoreError::Storage(StorageError::IoError(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        FileStoreError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
        FileStoreError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        FileStoreError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
