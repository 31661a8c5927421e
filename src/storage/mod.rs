//! File system storage management
//!
//! Owns the flat storage directory: name validation, per-name locking and
//! the create/overwrite/remove/list/read operations.

pub mod locks;
pub mod operations;
pub mod results;
pub mod validation;

pub use locks::{NameGuard, NameLocks};
pub use operations::FileStore;
pub use results::{OverwriteOutcome, StoredEntry};
pub use validation::{is_hidden, is_temp_file, validate_file_name};
