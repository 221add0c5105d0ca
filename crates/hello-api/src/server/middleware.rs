//! Request-scoped logging and panic recovery.
//!
//! Every request runs inside one tracing span carrying a generated request id
//! plus method and path; handler logs and the completion line are emitted in
//! that span. Panics inside handlers are caught at this boundary, logged with
//! a backtrace, and converted to a 500 error payload without crashing the
//! process.

use std::any::Any;
use std::backtrace::Backtrace;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::protocol::ErrorResponse;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Attach a request-scoped logging span and emit the completion line.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let bytes_in = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    let span = info_span!("request", %request_id, method = %method, path = %path);

    async move {
        debug!("Started {method} request {path}");
        let started = Instant::now();
        let response = next.run(request).await;
        let latency = started.elapsed();
        info!(
            status = response.status().as_u16(),
            latency_ms = latency.as_millis() as u64,
            bytes_in,
            "Completed {method} request {path} in {latency:?} with {}",
            response.status().as_u16(),
        );
        response
    }
    .instrument(span)
    .await
}

/// Convert an unhandled handler panic into a 500 error payload.
///
/// Used with `CatchPanicLayer::custom`; the process keeps serving.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let message = if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    };
    error!(
        panic = true,
        status = 500,
        "Unhandled panic: {message}\n{}",
        Backtrace::force_capture(),
    );

    let body = ErrorResponse::new("Internal server error", message);
    match super::handlers::render_json(StatusCode::INTERNAL_SERVER_ERROR, &body) {
        Ok(response) => response,
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    use super::*;

    async fn exploding() -> Response {
        panic!("handler exploded");
    }

    #[tokio::test]
    async fn panic_is_converted_to_500_payload() {
        let app = Router::new()
            .route("/boom", get(exploding))
            .layer(CatchPanicLayer::custom(panic_response));

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.ends_with('\n'), "body must be newline-terminated");
        let err: ErrorResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(err.msg, "Internal server error");
        assert_eq!(err.error, "handler exploded");
    }
}
