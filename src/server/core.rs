use log::{error, info};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use axum::Router;

use crate::api::{AppState, router};
use crate::config::ServerConfig;
use crate::error::FileStoreError;
use crate::storage::FileStore;

pub struct Server {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl Server {
    /// Opens the storage directory and binds the HTTP listener.
    pub async fn bind(config: ServerConfig) -> Result<Self, FileStoreError> {
        let store = FileStore::open(config.storage_path()).await?;
        let state = AppState::new(store, config.default_top_n);
        let router = router(state, config.max_upload_size_bytes());

        let socket = config.socket_addr();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(FileStoreError::from(e));
            }
        };
        let local_addr = listener.local_addr()?;
        info!("Server bound to {}", local_addr);

        Ok(Self {
            listener,
            router,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves requests until Ctrl-C.
    pub async fn run(self) -> Result<(), FileStoreError> {
        self.run_until(shutdown_signal()).await
    }

    /// Serves requests until `signal` resolves, then drains in-flight requests.
    pub async fn run_until<F>(self, signal: F) -> Result<(), FileStoreError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting RAX file store on {}", self.local_addr);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await?;

        info!("Server on {} stopped", self.local_addr);
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
