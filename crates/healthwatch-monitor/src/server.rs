//! Public status HTTP server.
//!
//! Every request, whatever its method or path, receives the cached container
//! status as JSON.

use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::error::MonitorError;
use crate::public_status::{PublicStatusCache, StatusMap};

/// Build the status router.
pub fn status_router(cache: Arc<PublicStatusCache>) -> Router {
    Router::new().fallback(public_status).with_state(cache)
}

async fn public_status(State(cache): State<Arc<PublicStatusCache>>) -> Json<StatusMap> {
    Json(cache.get().await)
}

/// The public status server.
pub struct StatusServer {
    host: String,
    port: u16,
    cache: Arc<PublicStatusCache>,
}

impl StatusServer {
    pub fn new(host: impl Into<String>, port: u16, cache: Arc<PublicStatusCache>) -> Self {
        Self {
            host: host.into(),
            port,
            cache,
        }
    }

    /// Get the server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Serve until `shutdown` resolves. The host may be an IP address or a
    /// resolvable host name.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), MonitorError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|e| MonitorError::InvalidConfig(format!("server address {}: {}", self.addr(), e)))?;
        let addr = listener.local_addr()?;

        info!("Status server listening on {}", addr);
        axum::serve(listener, status_router(self.cache.clone()))
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Status server stopped");
        Ok(())
    }
}
