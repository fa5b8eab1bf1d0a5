//! Background HTTP server.
//!
//! `spawn` binds the listener and drives `axum::serve` on its own task, so the
//! caller's task stays free to wait for signals. The returned handle is the
//! only way to stop it: `shutdown` stops accepting, drains in-flight requests
//! and joins the task.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use ats_metrics_core::error::{AtsMetricsError, Result};

use crate::{app_state::AppState, router};

pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
}

/// Bind the configured port on all interfaces and start serving.
pub async fn spawn(state: AppState) -> Result<ServerHandle> {
    let addr = state.cfg().listen_addr();
    spawn_on(addr, state).await
}

/// Bind `addr` (port `0` picks a free one) and start serving.
pub async fn spawn_on(addr: SocketAddr, state: AppState) -> Result<ServerHandle> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AtsMetricsError::Io(format!("bind {addr} failed: {e}")))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| AtsMetricsError::Io(format!("local_addr failed: {e}")))?;

    let app = router::build_router(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                // A dropped sender also stops the server.
                let _ = shutdown_rx.await;
            })
            .await
    });

    tracing::info!(%local_addr, "metrics exporter listening");
    Ok(ServerHandle {
        local_addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        match self.task.await {
            Ok(Ok(())) => {
                tracing::info!(local_addr = %self.local_addr, "metrics exporter stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(AtsMetricsError::Io(format!("server failed: {e}"))),
            Err(e) => Err(AtsMetricsError::Internal(format!("server task failed: {e}"))),
        }
    }
}
