//! Data-access layer: the accessor trait, its error type, and the registry
//! through which handlers resolve the active implementation.
//!
//! Exactly one implementation — [`postgres::PgHelloDao`] in the server
//! binary, [`stub::StubHelloDao`] in tests — is installed into a
//! [`DaoRegistry`] at startup, before any request is served. Handlers never
//! construct an accessor directly; they resolve it through the registry, so
//! swapping the backend never touches handler code.

pub mod postgres;
pub mod stub;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Hello;

/// Errors produced by the data-access layer.
#[derive(Debug, Error)]
pub enum DaoError {
    /// The distinguished "no rows in result" condition; maps to 404 at the
    /// HTTP boundary, unlike every other database error.
    #[error("no rows in result")]
    NotFound,

    /// Negative pagination bounds were passed to `list`.
    #[error("invalid pagination bounds: limit {limit}, offset {offset}")]
    InvalidBounds { limit: i64, offset: i64 },

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl DaoError {
    /// Whether this error should map to a not-found response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DaoError::NotFound)
    }
}

impl From<sqlx::Error> for DaoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DaoError::NotFound,
            other => DaoError::Database(other),
        }
    }
}

/// Reject negative pagination bounds.
///
/// Both the PostgreSQL and the stub implementation call this, so pagination
/// semantics stay identical across backends.
pub(crate) fn check_bounds(limit: i64, offset: i64) -> Result<(), DaoError> {
    if limit < 0 || offset < 0 {
        return Err(DaoError::InvalidBounds { limit, offset });
    }
    Ok(())
}

/// Access methods for the stored state of hellos.
#[async_trait]
pub trait HelloDao: Send + Sync {
    /// Return up to `limit` hellos ordered by identifier, skipping `offset`.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Hello>, DaoError>;

    /// Persist `hello`, returning it with the storage-assigned identifier.
    async fn record(&self, hello: Hello) -> Result<Hello, DaoError>;
}

/// The process's single indirection point for data access.
///
/// Built once at startup and threaded into the router via `AppState`; there
/// is no global mutable slot. Using a registry with nothing installed, or
/// installing twice, signals a construction-order bug and fails fast.
#[derive(Default)]
pub struct DaoRegistry {
    hello: Option<Arc<dyn HelloDao>>,
}

impl DaoRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the hello accessor.
    ///
    /// # Panics
    ///
    /// Panics if an accessor is already installed; this is a programming
    /// error, not a runtime condition.
    pub fn install_hello(&mut self, dao: Arc<dyn HelloDao>) {
        if self.hello.is_some() {
            panic!("hello accessor already installed");
        }
        self.hello = Some(dao);
    }

    /// Resolve the active hello accessor.
    ///
    /// # Panics
    ///
    /// Panics if no accessor has been installed; handlers must never run
    /// before startup wiring completes.
    pub fn hello(&self) -> Arc<dyn HelloDao> {
        self.hello
            .clone()
            .expect("no hello accessor installed; install one before serving requests")
    }
}

#[cfg(test)]
mod tests {
    use super::stub::StubHelloDao;
    use super::*;

    #[test]
    fn install_and_resolve() {
        let mut registry = DaoRegistry::new();
        registry.install_hello(Arc::new(StubHelloDao::default()));
        let _dao = registry.hello();
    }

    #[test]
    #[should_panic(expected = "hello accessor already installed")]
    fn double_install_panics() {
        let mut registry = DaoRegistry::new();
        registry.install_hello(Arc::new(StubHelloDao::default()));
        registry.install_hello(Arc::new(StubHelloDao::default()));
    }

    #[test]
    #[should_panic(expected = "no hello accessor installed")]
    fn resolve_from_empty_registry_panics() {
        let registry = DaoRegistry::new();
        let _dao = registry.hello();
    }

    #[test]
    fn row_not_found_is_the_not_found_marker() {
        let err = DaoError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn other_sqlx_errors_are_not_not_found() {
        let err = DaoError::from(sqlx::Error::PoolClosed);
        assert!(!err.is_not_found());
    }

    #[test]
    fn negative_bounds_are_rejected() {
        assert!(check_bounds(-1, 0).is_err());
        assert!(check_bounds(10, -5).is_err());
        assert!(check_bounds(0, 0).is_ok());
    }
}
