use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use vtschedule::ScheduleApiExt;
use vtserver::Server;

async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(body: &'static str) -> Request<Body> {
    Request::post("/api/schedule")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_schedule_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = Server::new("Test", "localhost", 0);
    server
        .init_schedule_api(dir.path().join("schedule.json"))
        .await
        .unwrap();
    let router = server.router().await;

    let (status, body) = call(&router, Request::get("/api/schedule").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blocks"].as_array().unwrap().len(), 15);

    let (status, body) = call(
        &router,
        post(r#"{"school_start": "08:00", "school_end": "09:00", "blocks": [{"start_time": "08:00", "end_time": "09:00", "name": "Only", "type": "lesson"}]}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Schedule updated.");

    let (_, body) = call(&router, Request::get("/api/schedule").body(Body::empty()).unwrap()).await;
    assert_eq!(body["blocks"][0]["name"], "Only");

    let (status, body) = call(&router, post("")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Request body is empty.");

    let (status, body) = call(&router, post("not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid JSON format.");

    let (status, body) = call(&router, post(r#"{"school_start": "x", "school_end": "09:00"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_SCHEDULE");
}
