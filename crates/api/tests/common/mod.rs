#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use sprintboard_api::config::ServerConfig;
use sprintboard_api::router::build_app_router;
use sprintboard_api::state::AppState;
use sprintboard_core::store::MemoryStore;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout. No database is involved.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 1,
    }
}

/// Build the full application router over `store`, with the same middleware
/// stack production uses.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    let config = test_config();
    let state = AppState::new(store, config.clone());
    build_app_router(state, &config)
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixture builders (through the API, returning the new id)
// ---------------------------------------------------------------------------

async fn create(app: &Router, uri: &str, body: Value) -> String {
    let response = post_json(app.clone(), uri, body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED, "POST {uri}");
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

pub async fn create_center(app: &Router, name: &str) -> String {
    create(app, "/api/v1/service-centers", json!({ "name": name, "location": "Lyon" })).await
}

pub async fn create_project(app: &Router, center_id: Option<&str>, ratio: f64) -> String {
    create(
        app,
        "/api/v1/projects",
        json!({ "name": "Apollo", "center_id": center_id, "workload_ratio": ratio }),
    )
    .await
}

/// A Monday to Friday sprint.
pub async fn create_sprint(app: &Router, project_id: &str, name: &str) -> String {
    create(
        app,
        "/api/v1/sprints",
        json!({
            "project_id": project_id,
            "name": name,
            "start_date": "2025-01-06T09:00:00Z",
            "due_date": "2025-01-10T18:00:00Z",
        }),
    )
    .await
}

pub async fn create_task(app: &Router, sprint_id: &str, story_points: f64) -> String {
    create(
        app,
        "/api/v1/tasks",
        json!({
            "sprint_id": sprint_id,
            "key": "APO-1",
            "summary": "Wire the thing",
            "story_points": story_points,
        }),
    )
    .await
}
