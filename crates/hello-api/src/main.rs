//! `api` — HTTP server binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from files, environment, and the optional
//!    platform override.
//! 2. Initialise the telemetry pipeline (JSON logs + optional OTLP export).
//! 3. Initialise the connection pool and probe the database.
//! 4. Install the PostgreSQL accessor into the data-access registry.
//! 5. Build the Axum router and serve until a termination signal arrives.
//! 6. Drain, join the signal watcher, and only then close the pool.
//!
//! Migrations are not run here; the `migrate` binary applies them and exits.

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use hello_api::config::Config;
use hello_api::dao::postgres::PgHelloDao;
use hello_api::dao::DaoRegistry;
use hello_api::server::state::AppState;
use hello_api::{db, server, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::load(&["config/api"]).map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.logging.level, cfg.telemetry.otlp_endpoint.as_deref())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.app.port,
        "hello-api starting"
    );

    // -----------------------------------------------------------------------
    // 3. Database pool
    // -----------------------------------------------------------------------
    let pool = db::init_pool(&cfg.database, &cfg.logging, "public").await?;

    // -----------------------------------------------------------------------
    // 4. Data-access wiring
    // -----------------------------------------------------------------------
    let mut registry = DaoRegistry::new();
    registry.install_hello(Arc::new(PgHelloDao::new(pool.clone())));
    let state = AppState::new(registry);

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let router = server::router::build(state);
    let shutdown = CancellationToken::new();
    let signal_watcher = server::spawn_signal_watcher(shutdown.clone());

    let served = server::serve(router, cfg.app.port, shutdown.clone()).await;
    if let Err(err) = &served {
        error!(error = %err, "Main service listen error");
    }

    // -----------------------------------------------------------------------
    // 6. Shutdown: listener is stopped, then the watcher, then the pool.
    // The serve error, if any, decides the exit code only after cleanup.
    // -----------------------------------------------------------------------
    shutdown.cancel();
    let _ = signal_watcher.await;
    db::close_pool(&pool).await;

    served
}
