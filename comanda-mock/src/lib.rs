//! Comanda Mock - in-memory restaurant backend
//!
//! Serves the same REST routes as the real backend from process memory.
//! Used by the client's integration tests and as a local development
//! server.

pub mod api;
pub mod error;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub use error::{MockError, MockResult};
pub use state::{AppState, RecordedRequest, SEED_EMAIL, SEED_PASSWORD};

/// Running mock backend; stops when dropped
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start a seeded backend on an ephemeral localhost port
pub async fn spawn() -> std::io::Result<MockServer> {
    serve("127.0.0.1:0", Arc::new(AppState::seeded())).await
}

/// Start a backend bound to `addr` in a background task
pub async fn serve(addr: &str, state: Arc<AppState>) -> std::io::Result<MockServer> {
    let listener = TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    let app = api::router(state.clone());

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Mock backend stopped");
        }
    });

    tracing::info!(%addr, "Mock backend listening");
    Ok(MockServer {
        addr,
        state,
        handle,
    })
}
