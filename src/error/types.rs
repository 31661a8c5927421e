//! Error types
//!
//! Defines domain-specific error types for the storage layer and the server.

use std::fmt;
use std::io;

/// Storage module errors
#[derive(Debug)]
pub enum StorageError {
    /// A file with this name is already stored
    AlreadyExists(String),
    /// No file with this name is stored
    NotFound(String),
    /// The name cannot be used as a flat file name
    InvalidName(String),
    IoError(io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::AlreadyExists(name) => write!(f, "File '{}' already exists.", name),
            StorageError::NotFound(name) => write!(f, "File '{}' not found.", name),
            StorageError::InvalidName(reason) => write!(f, "Invalid file name: {}", reason),
            StorageError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::IoError(error)
    }
}

/// General server error that encompasses all error types
#[derive(Debug)]
pub enum FileStoreError {
    Storage(StorageError),
    InvalidParameter(String),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for FileStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStoreError::Storage(e) => write!(f, "{}", e),
            FileStoreError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            FileStoreError::Config(e) => write!(f, "Configuration error: {}", e),
            FileStoreError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FileStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileStoreError::Storage(e) => Some(e),
            FileStoreError::Config(e) => Some(e),
            FileStoreError::IoError(e) => Some(e),
            FileStoreError::InvalidParameter(_) => None,
        }
    }
}

impl From<StorageError> for FileStoreError {
    fn from(error: StorageError) -> Self {
        FileStoreError::Storage(error)
    }
}

impl From<config::ConfigError> for FileStoreError {
    fn from(error: config::ConfigError) -> Self {
        FileStoreError::Config(error)
    }
}

impl From<io::Error> for FileStoreError {
    fn from(error: io::Error) -> Self {
        FileStoreError::IoError(error)
    }
}
