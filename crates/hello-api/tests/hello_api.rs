//! End-to-end tests over the full router with the stub accessor installed,
//! exercising the same wiring the server binary uses minus the real pool.

use axum_test::TestServer;
use common::protocol::{ErrorResponse, HelloRequest, HelloResponse};
use hello_api::server::handlers::RECIPIENT;
use hello_api::server::router;
use hello_api::server::state::AppState;

fn test_server() -> TestServer {
    TestServer::new(router::build(AppState::with_stub())).expect("router must start")
}

#[tokio::test]
async fn get_hellos_on_empty_store() {
    let server = test_server();

    let response = server.get("/api/hello/v1/hellos").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "[]\n");
}

#[tokio::test]
async fn post_then_get_round_trip() {
    let server = test_server();

    let response = server
        .post("/api/hello/v1/hellos")
        .json(&HelloRequest {
            sender: "a@x.com".into(),
            message: "hi".into(),
        })
        .await;
    assert_eq!(response.status_code(), 201);
    let created: HelloResponse = response.json();
    assert_eq!(created.sender, "a@x.com");
    assert_eq!(created.message, "hi");
    assert_eq!(created.recipient, RECIPIENT);

    let response = server.get("/api/hello/v1/hellos").await;
    response.assert_status_ok();
    let listed: Vec<HelloResponse> = response.json();
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn both_version_mounts_share_the_store() {
    let server = test_server();

    server
        .post("/api/hello/v1/hellos")
        .json(&HelloRequest {
            sender: "a@x.com".into(),
            message: "hi".into(),
        })
        .await
        .assert_status_success();

    let listed: Vec<HelloResponse> = server.get("/api/hello/v1.0/hellos").await.json();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn malformed_post_body_yields_error_payload() {
    let server = test_server();

    let response = server
        .post("/api/hello/v1/hellos")
        .json(&serde_json::json!({"sender": 42}))
        .await;
    assert_eq!(response.status_code(), 400);
    let err: ErrorResponse = response.json();
    assert_eq!(err.msg, "Invalid request: say hello");
    assert!(!err.error.is_empty());
}

#[tokio::test]
async fn unknown_route_yields_error_payload() {
    let server = test_server();

    let response = server.get("/api/hello/v1/nope").await;
    assert_eq!(response.status_code(), 404);
    let err: ErrorResponse = response.json();
    assert_eq!(err.msg, "Not found: route");
}
