//! Configuration management for the RAX File Store
//!
//! Values are layered: built-in defaults, then an optional `config.toml`,
//! then `RAX_STORE_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_STORAGE_DIR: &str = "./storage";
pub const DEFAULT_MAX_UPLOAD_SIZE_MB: u64 = 100;
pub const DEFAULT_TOP_N: i64 = 10;

/// Locations searched for `config.toml`, first match wins per key.
const CONFIG_PATHS: [&str; 2] = [
    "rax-file-store/config", // Docker production: /app/rax-file-store/config.toml
    "config",                // Local development: ./config.toml
];

/// Startup configuration. Changing any value requires a restart.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address the HTTP listener binds to
    pub bind_address: String,

    /// HTTP port (0 picks an ephemeral port, only accepted outside `load`)
    pub port: u16,

    /// Flat directory holding the stored files
    pub storage_dir: String,

    /// Request body limit for upload/update in MB
    pub max_upload_size_mb: u64,

    /// Number of entries returned by frequent-words when `n` is omitted
    pub default_top_n: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            storage_dir: DEFAULT_STORAGE_DIR.to_string(),
            max_upload_size_mb: DEFAULT_MAX_UPLOAD_SIZE_MB,
            default_top_n: DEFAULT_TOP_N,
        }
    }
}

impl ServerConfig {
    /// Load configuration from defaults, config.toml and environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("storage_dir", DEFAULT_STORAGE_DIR)?
            .set_default("max_upload_size_mb", DEFAULT_MAX_UPLOAD_SIZE_MB as i64)?
            .set_default("default_top_n", DEFAULT_TOP_N)?;

        for path in CONFIG_PATHS {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix("RAX_STORE"))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration rooted at `storage_dir`, listening on an ephemeral local port
    pub fn ephemeral(storage_dir: impl AsRef<Path>) -> Self {
        Self {
            port: 0,
            storage_dir: storage_dir.as_ref().to_string_lossy().to_string(),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if self.storage_dir.trim().is_empty() {
            return Err(ConfigError::Message("storage_dir cannot be empty".into()));
        }

        if self.max_upload_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_upload_size_mb must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Bind address and port as a socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_dir)
    }

    /// Upload limit in bytes
    pub fn max_upload_size_bytes(&self) -> usize {
        let bytes = self.max_upload_size_mb.saturating_mul(1024 * 1024);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }
}
