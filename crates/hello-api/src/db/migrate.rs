//! Embedded schema migrations.
//!
//! Scripts live in `migrations/NNNN_name.sql` and are compiled in with
//! `include_str!`. Only "up" migrations are supported. Applied versions are
//! recorded in a per-schema `schema_migrations_history` table; each pending
//! script runs in one transaction together with its history row, so a rerun
//! of the runner applies nothing and succeeds (idempotent by recorded
//! history).

use anyhow::Result;
use sqlx::postgres::{PgDatabaseError, PgErrorPosition};
use sqlx::{Acquire, PgPool};
use thiserror::Error;
use tracing::{debug, info};

/// One embedded, ordered, up-only migration script.
#[derive(Debug)]
pub struct Migration {
    /// Numeric order; strictly increasing across the embedded set.
    pub version: i32,
    pub name: &'static str,
    pub sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_hellos",
    sql: include_str!("../../migrations/0001_create_hellos.sql"),
}];

/// Errors produced by the migration runner.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// The embedded migration set is empty.
    #[error("no migrations found")]
    NoMigrations,

    /// A migration script failed; `detail` carries the server message, the
    /// offending SQL line, and a caret pointing at the failing column.
    #[error("unable to perform migration {version} ({name}): {detail}")]
    Migration {
        version: i32,
        name: &'static str,
        detail: String,
    },

    /// A failure outside any script (history bookkeeping, pool access).
    #[error("migration database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Apply all unapplied migrations against `schema`.
///
/// An empty `schema` defaults to `public`. The schema and history table are
/// created if missing, then every script with a version above the recorded
/// maximum runs in order.
pub async fn run(pool: &PgPool, schema: &str) -> Result<(), MigrateError> {
    if MIGRATIONS.is_empty() {
        return Err(MigrateError::NoMigrations);
    }
    let schema = if schema.is_empty() { "public" } else { schema };
    debug!(migration = true, "Started migration");

    let mut conn = pool.acquire().await?;
    let table = format!("{schema}.schema_migrations_history");

    let create_schema = format!("CREATE SCHEMA IF NOT EXISTS {schema}");
    sqlx::query(&create_schema).execute(&mut *conn).await?;
    let create_history = format!(
        "CREATE TABLE IF NOT EXISTS {table} \
         (version integer PRIMARY KEY, applied_at timestamptz NOT NULL DEFAULT now())"
    );
    sqlx::query(&create_history).execute(&mut *conn).await?;

    let select_current = format!("SELECT max(version) FROM {table}");
    let (current,): (Option<i32>,) = sqlx::query_as(&select_current)
        .fetch_one(&mut *conn)
        .await?;
    let current = current.unwrap_or(0);

    let insert_history = format!("INSERT INTO {table} (version) VALUES ($1)");
    for migration in pending_in(MIGRATIONS, current) {
        let mut tx = conn.begin().await?;
        if let Err(err) = sqlx::raw_sql(migration.sql).execute(&mut *tx).await {
            return Err(script_error(migration, err));
        }
        sqlx::query(&insert_history)
            .bind(migration.version)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!(
            migration = true,
            version = migration.version,
            name = migration.name,
            "Applied migration"
        );
    }

    let select_history = format!("SELECT version, applied_at::text FROM {table} ORDER BY version");
    let history: Vec<(i32, String)> = sqlx::query_as(&select_history)
        .fetch_all(&mut *conn)
        .await?;
    for (version, applied_at) in &history {
        info!(migration = true, "Version {version} was applied {applied_at}");
    }

    info!(migration = true, "Finished with migration");
    Ok(())
}

/// Migrations with a version above the recorded maximum, in embedded order.
fn pending_in(migrations: &'static [Migration], current: i32) -> Vec<&'static Migration> {
    migrations
        .iter()
        .filter(|m| m.version > current)
        .collect()
}

/// Wrap a script failure, attaching SQL diagnostics when the database
/// reported an error position.
fn script_error(migration: &'static Migration, err: sqlx::Error) -> MigrateError {
    let Some(pg) = err
        .as_database_error()
        .and_then(|db| db.try_downcast_ref::<PgDatabaseError>())
    else {
        return MigrateError::Database(err);
    };
    MigrateError::Migration {
        version: migration.version,
        name: migration.name,
        detail: fmt_detailed_error(migration.sql, pg),
    }
}

fn fmt_detailed_error(sql: &str, pg: &PgDatabaseError) -> String {
    let mut out = String::new();
    out.push_str(pg.message());

    if let Some(detail) = pg.detail() {
        out.push_str("\nDETAIL: ");
        out.push_str(detail);
    }

    match pg.position() {
        Some(PgErrorPosition::Original(position)) => {
            if let Some(block) = caret_block(sql, position) {
                out.push('\n');
                out.push_str(&block);
            }
        }
        Some(PgErrorPosition::Internal { position, query }) => {
            if let Some(block) = caret_block(query, position) {
                out.push('\n');
                out.push_str(&block);
            }
        }
        None => {}
    }

    if let Some(context) = pg.r#where() {
        out.push_str("\nWHERE: ");
        out.push_str(context);
    }

    out
}

/// Render `LINE n: <text>` plus a caret under the failing column.
///
/// `position` is the database's 1-based character offset into the script.
fn caret_block(sql: &str, position: usize) -> Option<String> {
    let line = extract_error_line(sql, position)?;
    // A position on a line-terminating newline yields column 0; the caret
    // still has to land inside the line.
    let column = line.column_num.max(1);
    let prefix = format!("LINE {}: ", line.line_num);
    let padding = " ".repeat(prefix.len() + column - 1);
    Some(format!("{prefix}{}\n{padding}^", line.text))
}

struct ErrorLine {
    line_num: usize,
    column_num: usize,
    text: String,
}

fn extract_error_line(sql: &str, position: usize) -> Option<ErrorLine> {
    if position == 0 {
        return None;
    }
    let mut chars_before = 0usize;
    for (index, line) in sql.lines().enumerate() {
        let line_chars = line.chars().count();
        if position <= chars_before + line_chars {
            return Some(ErrorLine {
                line_num: index + 1,
                column_num: position - chars_before,
                text: line.to_owned(),
            });
        }
        // +1 for the newline consumed by `lines()`
        chars_before += line_chars + 1;
    }
    None
}
