//! HTTP API Server

use super::{handlers::AppState, routes::RelayApi};
use crate::Result;
use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

/// API server owning the bind address and shared handler state
pub struct ApiServer {
    bind_addr: SocketAddr,
    app_state: AppState,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(bind_addr: SocketAddr, app_state: AppState) -> Self {
        Self {
            bind_addr,
            app_state,
        }
    }

    /// Start serving requests
    pub async fn start(self) -> Result<()> {
        let app = RelayApi::create_router(self.app_state);

        let listener = TcpListener::bind(self.bind_addr)
            .await
            .with_context(|| format!("Failed to bind API server to {}", self.bind_addr))?;

        info!("API server listening on {}", self.bind_addr);

        if let Err(e) = axum::serve(listener, app).await {
            error!("API server error: {}", e);
            return Err(e.into());
        }

        Ok(())
    }

    /// Create a router for testing
    pub fn create_test_router(&self) -> Router {
        RelayApi::create_router(self.app_state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::relay::RelaySession;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::RwLock;

    #[tokio::test]
    async fn test_api_server_creation() {
        let state = AppState::new(
            Arc::new(RelaySession::new(Duration::from_secs(2))),
            Arc::new(RwLock::new(Config::default())),
        );
        let bind_addr = "127.0.0.1:8001".parse().unwrap();

        let server = ApiServer::new(bind_addr, state);

        let _router = server.create_test_router();
    }
}
