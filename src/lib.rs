pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod storage;

pub use config::ServerConfig;
pub use error::{FileStoreError, StorageError};
pub use server::Server;
pub use storage::FileStore;
