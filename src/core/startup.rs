// Helpers for bringing the login app up in-process

use crate::core::routes::build_router;
use crate::core::state::AppState;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Login app served on a background task. Dropping it stops the server.
pub struct RunningApp {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl RunningApp {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for RunningApp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Bind `bind_addr` (use port 0 for an ephemeral port) and serve the app on it
pub async fn spawn_app(state: AppState, bind_addr: &str) -> Result<RunningApp> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .context(format!("Failed to bind TCP listener to {}", bind_addr))?;

    let addr = listener
        .local_addr()
        .context("Failed to read bound listener address")?;

    let app = build_router(Arc::new(state));

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Login app server error");
        }
    });

    info!(address = %addr, "Login app listening");

    Ok(RunningApp { addr, handle })
}
