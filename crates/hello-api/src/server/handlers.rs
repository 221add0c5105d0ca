//! Axum request handlers for the hellos resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::protocol::{ErrorResponse, HelloRequest, HelloResponse};
use common::ServiceError;
use serde::Serialize;
use tracing::error;

use super::state::AppState;
use crate::dao::DaoError;
use crate::models::Hello;

/// Fixed recipient assigned by the server to every recorded hello.
pub const RECIPIENT: &str = "Template Maintainers <hello-api@example.com>";

/// Page size used when listing hellos.
const LIST_LIMIT: i64 = 100;

/// `GET /hellos` — list recorded hellos ordered by identifier.
pub async fn list_hellos(State(state): State<AppState>) -> Response {
    let dao = state.registry.hello();
    let hellos = match dao.list(LIST_LIMIT, 0).await {
        Ok(hellos) => hellos,
        Err(err) => return dao_error_response("list hellos", &err),
    };

    let payload: Vec<HelloResponse> = hellos.iter().map(hello_response).collect();
    render_or_error(StatusCode::OK, &payload, "unable to render hello list")
}

/// `POST /hellos` — record a new hello with the server-assigned recipient.
pub async fn say_hello(
    State(state): State<AppState>,
    payload: Result<Json<HelloRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return render_error(
                &ServiceError::InvalidRequest("say hello".into()),
                &rejection.body_text(),
            );
        }
    };

    let hello = Hello::new(request.sender, RECIPIENT, request.message);
    let dao = state.registry.hello();
    let recorded = match dao.record(hello).await {
        Ok(recorded) => recorded,
        Err(err) => return dao_error_response("record hello", &err),
    };

    render_or_error(
        StatusCode::CREATED,
        &hello_response(&recorded),
        "unable to render hello",
    )
}

/// Catch-all 404 handler.
pub async fn not_found() -> Response {
    render_error(
        &ServiceError::NotFound("route".into()),
        "no route matched the request path",
    )
}

fn hello_response(hello: &Hello) -> HelloResponse {
    HelloResponse {
        sender: hello.sender.clone(),
        message: hello.message.clone(),
        recipient: hello.recipient.clone(),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Serialise `value` with a trailing newline, falling back to the error
/// pipeline if serialisation fails.
fn render_or_error<T: Serialize>(status: StatusCode, value: &T, operation: &str) -> Response {
    match render_json(status, value) {
        Ok(response) => response,
        Err(err) => render_error(&ServiceError::Render(operation.into()), &err.to_string()),
    }
}

/// Serialise `value` with a trailing newline, the way every response body in
/// this service is written.
pub(super) fn render_json<T: Serialize>(
    status: StatusCode,
    value: &T,
) -> Result<Response, serde_json::Error> {
    let mut body = serde_json::to_vec(value)?;
    body.push(b'\n');
    Ok((
        status,
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        body,
    )
        .into_response())
}

/// Map a DAO failure to 404 (the distinguished "no rows" condition) or 500.
fn dao_error_response(operation: &str, err: &DaoError) -> Response {
    let service_err = if err.is_not_found() {
        ServiceError::NotFound(operation.into())
    } else {
        ServiceError::Dao(operation.into())
    };
    render_error(&service_err, &err.to_string())
}

/// Render the structured error payload for `err` with its mapped status.
fn render_error<E: std::fmt::Display + ?Sized>(err: &ServiceError, cause: &E) -> Response {
    let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let payload = ErrorResponse::new(err.to_string(), cause.to_string());
    match render_json(status, &payload) {
        Ok(response) => response,
        Err(render_err) => write_basic_error(&payload, &render_err),
    }
}

/// Last-resort error write, used when even the structured error payload
/// cannot be rendered.
fn write_basic_error(payload: &ErrorResponse, render_err: &serde_json::Error) -> Response {
    error!("unable to render error {render_err}");
    let body = format!(r#"{{"msg": "{}", "error": "{}"}}"#, payload.msg, payload.error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        body,
    )
        .into_response()
}
