//! Connection pool lifecycle: construction, liveness probe, and close.
//!
//! There is no retry at this layer — a parse, construct, or ping failure is
//! returned to the caller, and process startup decides whether to abort.

pub mod migrate;

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, Connection, PgPool};
use tracing::info;

use crate::config::{DatabaseConfig, LoggingConfig};

/// Build the pool from configuration and verify the database is reachable.
///
/// The `schema` becomes the connection's `search_path`; an empty string means
/// `public`. When `logging.database_level` is above `off`, every statement is
/// logged at that level through the pool's log hook.
///
/// # Errors
///
/// Returns a descriptive error if the configuration cannot be parsed into
/// connect options, the pool cannot be constructed, or the ping probe fails.
pub async fn init_pool(
    database: &DatabaseConfig,
    logging: &LoggingConfig,
    schema: &str,
) -> Result<PgPool> {
    let schema = if schema.is_empty() { "public" } else { schema };

    let mut options = PgConnectOptions::new()
        .host(&database.host)
        .port(database.port)
        .database(&database.name)
        .username(&database.user)
        .options([("search_path", schema)]);
    if !database.password.is_empty() {
        options = options.password(&database.password);
    }

    let statement_level = logging
        .database_level
        .parse::<log::LevelFilter>()
        .context("cannot parse db log level configuration")?;
    if statement_level > log::LevelFilter::Off {
        options = options.log_statements(statement_level);
    }

    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .connect_with(options)
        .await
        .context("unable to create connection pool")?;

    pool.acquire()
        .await
        .context("unable to acquire a connection from the pool")?
        .ping()
        .await
        .context("unable to ping the database")?;

    Ok(pool)
}

/// Close the pool; must be called exactly once, after the HTTP listener has
/// fully stopped (in-flight requests may still need connections).
pub async fn close_pool(pool: &PgPool) {
    info!("Closing all database connections");
    pool.close().await;
}
