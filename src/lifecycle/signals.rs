//! Shutdown signal handling.

use std::time::Duration;

use axum_server::Handle;

/// Deadline for draining in-flight requests after a shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Wait for SIGINT or SIGTERM, then drain the server handle gracefully.
pub async fn shutdown_on_signal(handle: Handle) {
    wait_for_signal().await;
    tracing::info!("Shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(DRAIN_TIMEOUT));
}

async fn wait_for_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
