//! RAX File Store - Entry Point
//!
//! A network file repository with word statistics over the stored files.

use env_logger::Env;
use log::{error, info};

use rax_file_store::{FileStoreError, Server, ServerConfig};

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default filter
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Launching file store server...");

    if let Err(e) = run().await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), FileStoreError> {
    let config = ServerConfig::load()?;
    let server = Server::bind(config).await?;
    server.run().await
}
