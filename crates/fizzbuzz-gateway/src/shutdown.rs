//! Graceful shutdown: signal handling and the drain deadline.

use std::time::Duration;

use tokio::signal;
use tokio::sync::watch;

use crate::app_state::AppState;

/// Resolve on Ctrl-C or SIGTERM, mark the service as draining and notify `drain_tx`.
pub async fn wait_for_signal(state: AppState, drain_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, draining");
    state.set_draining();
    let _ = drain_tx.send(true);
}

/// Resolve `timeout` after draining began. Never resolves if it never begins.
pub async fn drain_deadline(mut drain_rx: watch::Receiver<bool>, timeout: Duration) {
    while !*drain_rx.borrow() {
        if drain_rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
    tokio::time::sleep(timeout).await;
}
