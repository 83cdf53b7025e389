//! Server startup and lifecycle

use crate::{routes, AppState};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

/// Handle to a running gateway.
///
/// Shutting down (explicitly or by dropping the handle) stops accepting
/// connections at once and lets in-flight requests finish.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<std::io::Result<()>>>,
}

impl ServerHandle {
    /// The address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Base URL of the gateway, e.g. `http://127.0.0.1:3000`
    pub fn url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Stop accepting connections and wait for in-flight requests to drain
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            join.await??;
        }
        info!("Gateway shutdown complete");
        Ok(())
    }
}

/// Bind the listener and serve in a background task
pub async fn start(state: Arc<AppState>) -> anyhow::Result<ServerHandle> {
    let addr = state.config.bind_addr();
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    info!("Retainer gateway listening on http://{}", local_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Shutdown requested, draining in-flight requests");
            })
            .await
    });

    Ok(ServerHandle {
        local_addr,
        shutdown_tx: Some(shutdown_tx),
        join: Some(join),
    })
}

/// Run the gateway until `shutdown_signal` resolves
pub async fn run_server_with_shutdown(
    state: Arc<AppState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let handle = start(state).await?;
    shutdown_signal.await;
    handle.shutdown().await
}

/// Run the gateway until Ctrl-C
pub async fn run_server(state: Arc<AppState>) -> anyhow::Result<()> {
    run_server_with_shutdown(state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    })
    .await
}
