//! Graceful shutdown and signal handling.
//!
//! SIGTERM and SIGINT both stop the accept loop; in-flight requests are
//! drained before the process exits.

use std::future::Future;

/// Install the SIGINT/SIGTERM handlers and return a future that resolves
/// when either signal arrives.
///
/// Handlers are registered before this returns, so a signal sent right
/// after the startup banner is still caught. If a handler cannot be
/// installed that branch never resolves.
#[cfg(unix)]
pub fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    use tokio::signal::unix::{signal, Signal, SignalKind};

    fn install(kind: SignalKind, name: &'static str) -> Option<Signal> {
        signal(kind)
            .map_err(|e| tracing::error!(error = %e, signal = name, "Failed to install signal handler"))
            .ok()
    }

    async fn recv(signal: Option<Signal>) {
        match signal {
            Some(mut signal) => {
                signal.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    let interrupt = install(SignalKind::interrupt(), "SIGINT");
    let terminate = install(SignalKind::terminate(), "SIGTERM");

    async move {
        tokio::select! {
            _ = recv(interrupt) => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
            }
            _ = recv(terminate) => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
        }
    }
}

#[cfg(not(unix))]
pub fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, initiating graceful shutdown"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    }
}
