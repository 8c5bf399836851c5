//! HTTP surface: a thin axum layer over the client and the filter store.

pub mod error;
pub mod health;
pub mod routes;
pub mod shutdown;
pub mod tracing;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::api::TcgClient;
use crate::config::Config;

pub use error::{ErrorResponse, ServerError};
pub use routes::{build_router, AppState};
pub use shutdown::ShutdownManager;
pub use self::tracing::init_tracing;

pub struct Server {
    pub addr: SocketAddr,
    /// The bound listener. Populated by `bind()`, consumed by `run()`.
    listener: Option<TcpListener>,
    state: AppState,
    shutdown: Arc<ShutdownManager>,
}

impl Server {
    pub fn new(config: Config, client: TcgClient) -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            listener: None,
            state: AppState::new(client, config),
            shutdown: Arc::new(ShutdownManager::new()),
        }
    }

    /// Bind to the configured address. Port 0 picks a free port; the actual
    /// address is returned and stored in `addr`.
    pub async fn bind(&mut self) -> std::io::Result<SocketAddr> {
        let bind_addr: SocketAddr = self.state.config.server.bind_addr.parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid bind address '{}': {}", self.state.config.server.bind_addr, e),
            )
        })?;

        let listener = TcpListener::bind(bind_addr).await?;
        self.addr = listener.local_addr()?;
        self.listener = Some(listener);
        ::tracing::info!("Server bound to {}", self.addr);
        Ok(self.addr)
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: self.shutdown.clone(),
        }
    }

    /// Serve until a shutdown signal arrives.
    ///
    /// Consumes self to take ownership of the listener; binds first if
    /// `bind()` was not called.
    pub async fn run(mut self) -> std::io::Result<()> {
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => {
                self.bind().await?;
                self.listener.take().ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::NotConnected,
                        "listener missing after bind",
                    )
                })?
            }
        };

        ::tracing::info!("Starting server on {}", self.addr);

        let app = build_router(self.state.clone());
        let shutdown = self.shutdown.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                if let Err(e) = shutdown.wait_for_shutdown().await {
                    ::tracing::error!(error = %e, "Failed to install signal handlers");
                }
            })
            .into_future()
            .await?;

        ::tracing::info!("Server stopped");
        Ok(())
    }
}

#[derive(Clone)]
pub struct ServerHandle {
    shutdown: Arc<ShutdownManager>,
}

impl ServerHandle {
    pub fn shutdown(&self) {
        self.shutdown.signal_shutdown();
    }
}
