use crate::config::ServerConfig;
use crate::error::Result;
use crate::hub::HubHandle;
use crate::route::{create_relay_route, AppState};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Bound relay server, ready to accept connections
pub struct RelayServer {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl RelayServer {
    /// Bind the listener and start the matchmaker hub
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_address()).await?;
        let local_addr = listener.local_addr()?;
        let hub = HubHandle::spawn(config.command_buffer);

        // Report the port actually bound, not the requested one
        let config = config.with_port(local_addr.port());
        let router = create_relay_route(AppState {
            hub,
            config: Arc::new(config),
        });

        Ok(Self {
            listener,
            router,
            local_addr,
        })
    }

    /// Actual bound address (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(addr = %self.local_addr, "Relay server listening");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Relay server stopped");
        Ok(())
    }
}
