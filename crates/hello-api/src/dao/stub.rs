//! In-memory hello accessor for tests and local development.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{check_bounds, DaoError, HelloDao};
use crate::models::Hello;

/// Append-only in-memory store.
///
/// `record` assigns each hello an identifier equal to its zero-based
/// insertion index. `list` applies the same limit/offset semantics as the
/// PostgreSQL implementation.
#[derive(Debug, Default)]
pub struct StubHelloDao {
    store: Mutex<Vec<Hello>>,
}

#[async_trait]
impl HelloDao for StubHelloDao {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Hello>, DaoError> {
        check_bounds(limit, offset)?;
        let store = self.store.lock().expect("stub store lock poisoned");
        Ok(store
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn record(&self, mut hello: Hello) -> Result<Hello, DaoError> {
        let mut store = self.store.lock().expect("stub store lock poisoned");
        hello.id = store.len() as i64;
        store.push(hello.clone());
        Ok(hello)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello(n: usize) -> Hello {
        Hello::new(
            format!("sender{n}@example.com"),
            "recipient@example.com",
            format!("greeting {n}"),
        )
    }

    #[tokio::test]
    async fn list_returns_records_in_call_order_with_index_ids() {
        let dao = StubHelloDao::default();
        for n in 0..5 {
            dao.record(hello(n)).await.unwrap();
        }

        let listed = dao.list(100, 0).await.unwrap();
        assert_eq!(listed.len(), 5);
        for (index, record) in listed.iter().enumerate() {
            assert_eq!(record.id, index as i64);
            assert_eq!(record.sender, format!("sender{index}@example.com"));
        }
    }

    #[tokio::test]
    async fn record_returns_assigned_id() {
        let dao = StubHelloDao::default();
        let first = dao.record(hello(0)).await.unwrap();
        let second = dao.record(hello(1)).await.unwrap();
        assert_eq!(first.id, 0);
        assert_eq!(second.id, 1);
    }

    #[tokio::test]
    async fn list_applies_limit_and_offset() {
        let dao = StubHelloDao::default();
        for n in 0..5 {
            dao.record(hello(n)).await.unwrap();
        }

        let page = dao.list(2, 1).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, 1);
        assert_eq!(page[1].id, 2);
    }

    #[tokio::test]
    async fn list_rejects_negative_bounds() {
        let dao = StubHelloDao::default();
        let err = dao.list(-1, 0).await.unwrap_err();
        assert!(matches!(err, DaoError::InvalidBounds { .. }));
    }

    #[tokio::test]
    async fn empty_store_lists_empty() {
        let dao = StubHelloDao::default();
        assert!(dao.list(100, 0).await.unwrap().is_empty());
    }
}
