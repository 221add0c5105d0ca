//! PostgreSQL-backed DAO and migration-runner tests.
//!
//! These need a reachable database (`DATABASE__*` environment variables or a
//! `config/test` file) and are ignored by default:
//!
//! ```sh
//! DATABASE__NAME=hellos_test cargo test -- --ignored
//! ```
//!
//! Everything runs in the `integration` schema, which is dropped and
//! recreated by the migration runner on each run.

use hello_api::config::Config;
use hello_api::dao::postgres::PgHelloDao;
use hello_api::dao::HelloDao;
use hello_api::models::Hello;
use hello_api::{db, db::migrate};
use sqlx::PgPool;

const SCHEMA: &str = "integration";

async fn init_environment() -> (PgPool, PgHelloDao) {
    let cfg = Config::load(&["config/test"]).expect("cannot load test configuration");
    let pool = db::init_pool(&cfg.database, &cfg.logging, SCHEMA)
        .await
        .expect("cannot connect to database (integration schema)");

    let drop_schema = format!("DROP SCHEMA IF EXISTS {SCHEMA} CASCADE");
    sqlx::query(&drop_schema)
        .execute(&pool)
        .await
        .expect("cannot drop integration schema");
    migrate::run(&pool, SCHEMA)
        .await
        .expect("cannot run migrations");

    (pool.clone(), PgHelloDao::new(pool))
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn record_assigns_identifier_and_list_orders_by_it() {
    let (pool, dao) = init_environment().await;

    let first = dao
        .record(Hello::new("test@example.com", "another@example.com", "one"))
        .await
        .unwrap();
    let second = dao
        .record(Hello::new("test@example.com", "another@example.com", "two"))
        .await
        .unwrap();
    assert!(first.id > 0);
    assert!(second.id > first.id);

    let listed = dao.list(100, 0).await.unwrap();
    assert_eq!(listed, vec![first, second]);

    let page = dao.list(1, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].message, "two");

    db::close_pool(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn migration_runner_is_idempotent() {
    let (pool, dao) = init_environment().await;

    // Second run must apply nothing and succeed.
    migrate::run(&pool, SCHEMA).await.unwrap();

    // The table created by the first run is still intact.
    dao.record(Hello::new("test@example.com", "another@example.com", "hi"))
        .await
        .unwrap();
    assert_eq!(dao.list(100, 0).await.unwrap().len(), 1);

    db::close_pool(&pool).await;
}
