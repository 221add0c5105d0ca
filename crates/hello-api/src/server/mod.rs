//! HTTP server: routing, middleware, shared state, and the lifecycle
//! controller.
//!
//! Lifecycle states: starting → serving → shutting-down → stopped. The
//! listener serves until the shutdown token is cancelled (by the signal
//! watcher or the caller), then drains in-flight requests within a grace
//! period. The caller closes the connection pool only after [`serve`]
//! returns, so the pool always outlives the listener.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// How long in-flight requests may take to drain after shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Bind the listener and serve until `shutdown` is cancelled.
///
/// Returns once the listener has fully stopped: either all in-flight
/// requests drained, or the grace period elapsed and the remainder was
/// aborted (logged, not retried).
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails while
/// serving.
pub async fn serve(router: Router, port: u16, shutdown: CancellationToken) -> Result<()> {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("unable to bind {addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("listener has no local address")?;
    info!(addr = %local_addr, "listening");

    let drain_deadline = {
        let shutdown = shutdown.clone();
        async move {
            shutdown.cancelled().await;
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        }
    };

    tokio::select! {
        served = async {
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
        } => served.context("server error")?,
        () = drain_deadline => {
            warn!(
                "graceful shutdown did not finish within {SHUTDOWN_GRACE:?}, aborting in-flight requests"
            );
        }
    }

    Ok(())
}

/// Spawn the task that watches for termination signals.
///
/// On SIGINT or SIGTERM the shutdown token is cancelled exactly once; the
/// task also exits when the token is cancelled elsewhere (startup abort), so
/// joining it never hangs.
pub fn spawn_signal_watcher(shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            () = wait_for_termination() => {
                info!("Termination signal received, shutting down");
                shutdown.cancel();
            }
            () = shutdown.cancelled() => {}
        }
    })
}

async fn wait_for_termination() {
    let interrupt = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = interrupt => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(err) => {
                error!(error = %err, "cannot install SIGTERM handler, watching SIGINT only");
                let _ = interrupt.await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = interrupt.await;
    }
}
