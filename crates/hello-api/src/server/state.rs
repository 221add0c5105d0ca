//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::dao::stub::StubHelloDao;
use crate::dao::DaoRegistry;

/// Application state shared across all request handlers.
///
/// Carries the data-access registry; cloning is cheap (`Arc`), so Axum can
/// clone the state per request without copying anything expensive.
#[derive(Clone)]
pub struct AppState {
    /// Resolves the active data-access implementation.
    pub registry: Arc<DaoRegistry>,
}

impl AppState {
    /// Wrap a fully wired registry.
    pub fn new(registry: DaoRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// State backed by the in-memory stub accessor, for tests.
    pub fn with_stub() -> Self {
        let mut registry = DaoRegistry::new();
        registry.install_hello(Arc::new(StubHelloDao::default()));
        Self::new(registry)
    }
}
