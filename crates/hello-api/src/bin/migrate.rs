//! `migrate` — applies embedded schema migrations and exits.
//!
//! Reads the same configuration as the `api` binary plus an optional
//! `config/migrate` override file (later file wins), so migration-only
//! settings never leak into the serving process.

use anyhow::{Context, Result};

use hello_api::config::Config;
use hello_api::{db, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::load(&["config/api", "config/migrate"]).map_err(|e| {
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    telemetry::init_telemetry(&cfg.logging.level, cfg.telemetry.otlp_endpoint.as_deref())?;

    let pool = db::init_pool(&cfg.database, &cfg.logging, "public")
        .await
        .context("Error initializing database")?;

    let result = db::migrate::run(&pool, "public")
        .await
        .context("Error running migration");
    db::close_pool(&pool).await;
    result
}
