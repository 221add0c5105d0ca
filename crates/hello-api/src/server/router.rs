//! Axum router construction.

use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::{handlers, middleware, state::AppState};

/// Entry point for all public incoming requests; every API path is mounted
/// under this prefix.
pub const PATH_PREFIX: &str = "/api/hello";

fn versioned_prefix(version: &str) -> String {
    format!("{PATH_PREFIX}/{version}")
}

/// Build the application [`Router`] with all routes and middleware attached.
///
/// The same API router is mounted under both `v1` and `v1.0`.
pub fn build(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/hellos",
            get(handlers::list_hellos).post(handlers::say_hello),
        )
        .layer(axum::middleware::from_fn(middleware::request_logger));

    Router::new()
        .nest(&versioned_prefix("v1"), api.clone())
        .nest(&versioned_prefix("v1.0"), api)
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = build(AppState::with_stub());
        let req = Request::builder()
            .uri("/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn hellos_route_exists_under_both_versions() {
        for version in ["v1", "v1.0"] {
            let app = build(AppState::with_stub());
            let req = Request::builder()
                .uri(format!("/api/hello/{version}/hellos"))
                .body(Body::empty())
                .unwrap();
            let resp = app.oneshot(req).await.unwrap();
            assert_eq!(resp.status(), 200, "version {version}");
        }
    }

    #[tokio::test]
    async fn unversioned_prefix_is_not_mounted() {
        let app = build(AppState::with_stub());
        let req = Request::builder()
            .uri("/api/hello/hellos")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 404);
    }
}
