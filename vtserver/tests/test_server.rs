use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use tower::ServiceExt;
use utoipa::OpenApi;
use vtserver::logs::LogSetupResponse;
use vtserver::{LogState, Server, ServerBuilder};

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[derive(OpenApi)]
#[openapi(info(title = "Test API"))]
struct TestDoc;

#[tokio::test]
async fn test_add_route_serves_json() {
    let mut server = Server::new("Test", "localhost", 0);
    server
        .add_route("/info", || async { serde_json::json!({"version": "1.0.0"}) })
        .await;

    let response = server
        .router()
        .await
        .oneshot(Request::get("/info").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["version"], "1.0.0");
}

#[tokio::test]
async fn test_openapi_router_is_nested_under_api() {
    let mut server = Server::new("Test", "localhost", 0);
    let api = Router::new().route("/ping", get(|| async { Json("pong") }));
    server.add_openapi(api, TestDoc::openapi(), "test").await;

    let router = server.router().await;

    let response = router
        .clone()
        .oneshot(Request::get("/api/test/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(Request::get("/api-docs/test.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["info"]["title"], "Test API");
}

#[tokio::test]
async fn test_log_setup_changes_level() {
    let mut server = Server::new("Test", "localhost", 0);
    let state = LogState::new(10);
    server.register_log_routes(state.clone()).await;
    let router = server.router().await;

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/log_setup")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"level": "debug"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: LogSetupResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(body.current_level, "DEBUG");
    assert_eq!(state.get_max_level(), tracing::Level::DEBUG);

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/log_setup")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"level": "loud"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(Request::get("/log-dump").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.is_array());
}

#[test]
fn test_builder_port_override() {
    let server = ServerBuilder::new("Test", "signage.local", 8080)
        .http_port(9100)
        .build();

    let info = server.info();
    assert_eq!(info.name, "Test");
    assert_eq!(info.base_url, "signage.local");
    assert_eq!(info.http_port, 9100);
}
