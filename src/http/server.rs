//! HTTP server startup logic.
//!
//! Startup has two states. `bind` moves from starting to listening and
//! returns a [`Listening`] handle; only then is the banner printed. A bind
//! failure is returned to the caller and never retried.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::config::{self, AppConfig, SHUTDOWN_GRACE_PERIOD_SECS};
use crate::error::{AppError, ServerError};

use super::shutdown;

/// A bound listener that has not started serving yet.
#[derive(Debug)]
pub struct Listening {
    listener: TcpListener,
    local_addr: SocketAddr,
}

/// Bind the listening socket.
pub async fn bind(addr: SocketAddr) -> Result<Listening, ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| ServerError::Bind { addr, source })?;

    Ok(Listening {
        listener,
        local_addr,
    })
}

impl Listening {
    /// Address actually bound (resolves port 0 to the assigned port).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Startup banner for this listener.
    pub fn banner(&self) -> String {
        config::banner(self.local_addr.port())
    }

    /// Serve `app` until `shutdown` resolves, then drain in-flight requests
    /// for at most `grace`.
    pub async fn serve<F>(self, app: Router, shutdown: F, grace: Duration) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (triggered_tx, triggered_rx) = oneshot::channel::<()>();
        let signal = async move {
            shutdown.await;
            let _ = triggered_tx.send(());
        };

        let serve = axum::serve(self.listener, app).with_graceful_shutdown(signal);
        let serve = async move { serve.await.map_err(ServerError::Serve) };
        tokio::pin!(serve);

        let drain_deadline = async move {
            match triggered_rx.await {
                Ok(()) => tokio::time::sleep(grace).await,
                Err(_) => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = &mut serve => result,
            _ = drain_deadline => {
                tracing::warn!(
                    grace_secs = grace.as_secs(),
                    "Grace period elapsed with connections still open, exiting"
                );
                Ok(())
            }
        }
    }
}

/// Bind the configured address, print the banner and serve until a
/// shutdown signal arrives.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), AppError> {
    let addr = config.socket_addr()?;
    let listening = bind(addr).await?;
    let shutdown = shutdown::shutdown_signal();

    println!("{}", listening.banner());
    tracing::info!(addr = %listening.local_addr(), "Listening");

    listening
        .serve(
            app,
            shutdown,
            Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS),
        )
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
