//! Server core functionality
//!
//! Binds the HTTP listener over the storage directory and runs the router
//! until shutdown.

pub mod core;

pub use self::core::Server;
