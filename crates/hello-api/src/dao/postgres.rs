//! PostgreSQL-backed hello accessor.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{check_bounds, DaoError, HelloDao};
use crate::models::Hello;

/// Hello accessor querying the shared connection pool.
#[derive(Debug, Clone)]
pub struct PgHelloDao {
    pool: PgPool,
}

impl PgHelloDao {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HelloDao for PgHelloDao {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Hello>, DaoError> {
        check_bounds(limit, offset)?;
        let hellos = sqlx::query_as::<_, Hello>(
            "SELECT id, sender, recipient, message FROM hellos ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(hellos)
    }

    async fn record(&self, mut hello: Hello) -> Result<Hello, DaoError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO hellos (sender, recipient, message) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&hello.sender)
        .bind(&hello.recipient)
        .bind(&hello.message)
        .fetch_one(&self.pool)
        .await?;
        hello.id = id;
        Ok(hello)
    }
}
