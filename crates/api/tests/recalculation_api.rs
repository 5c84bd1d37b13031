//! HTTP-level integration tests for task writes and project ratio changes.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_project, create_sprint, create_task, get, post_json,
    put_json,
};
use serde_json::json;
use sprintboard_core::store::MemoryStore;

// ---------------------------------------------------------------------------
// Test: a new task gets its load and remaining time from the project ratio
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_task_starts_with_remaining_time_at_its_load() {
    let app = build_test_app(Arc::new(MemoryStore::new()));
    let project = create_project(&app, None, 2.0).await;
    let sprint = create_sprint(&app, &project, "Sprint 1").await;
    let task = create_task(&app, &sprint, 10.0).await;

    let response = get(app.clone(), &format!("/api/v1/tasks/{task}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["technical_load"], 5.0);
    assert_eq!(json["data"]["time_remaining"], 5.0);
    assert_eq!(json["data"]["delta"], 0.0);
    assert_eq!(json["data"]["progress"], 0.0);
    assert_eq!(json["data"]["project_id"], project.as_str());

    let response = get(app, &format!("/api/v1/sprints/{sprint}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["tasks"], json!([task]));
}

// ---------------------------------------------------------------------------
// Test: updating time figures recomputes delta and progress
// ---------------------------------------------------------------------------

#[tokio::test]
async fn task_update_recomputes_derived_fields() {
    let app = build_test_app(Arc::new(MemoryStore::new()));
    let project = create_project(&app, None, 2.0).await;
    let sprint = create_sprint(&app, &project, "Sprint 1").await;
    let task = create_task(&app, &sprint, 10.0).await;

    let response = put_json(
        app,
        "/api/v1/tasks/update",
        json!({ "id": task, "time_spent": 2.0, "time_remaining": 3.0, "status": "DONE" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["technical_load"], 5.0);
    assert_eq!(json["data"]["delta"], 0.0);
    assert_eq!(json["data"]["progress"], 40.0);
    assert_eq!(json["data"]["delivery_sprint_name"], "Sprint 1");
}

// ---------------------------------------------------------------------------
// Test: task writes against missing parents or unknown tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn task_writes_report_missing_records() {
    let app = build_test_app(Arc::new(MemoryStore::new()));

    let response = post_json(
        app.clone(),
        "/api/v1/tasks",
        json!({ "sprint_id": "0123456789abcdef01234567", "summary": "Orphan" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json(
        app,
        "/api/v1/tasks/update",
        json!({ "id": "0123456789abcdef01234567", "story_points": 3.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: a ratio change follows untouched estimates and keeps manual ones
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ratio_change_resyncs_untouched_remaining_time() {
    let app = build_test_app(Arc::new(MemoryStore::new()));
    let project = create_project(&app, None, 2.0).await;
    let sprint = create_sprint(&app, &project, "Sprint 1").await;
    let auto_task = create_task(&app, &sprint, 10.0).await;
    let manual_task = create_task(&app, &sprint, 10.0).await;

    let response = put_json(
        app.clone(),
        "/api/v1/tasks/update",
        json!({ "id": manual_task, "time_remaining": 1.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        app.clone(),
        "/api/v1/projects/update",
        json!({ "id": project, "workload_ratio": 5.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["project"]["workload_ratio"], 5.0);
    assert_eq!(json["data"]["recalculation"]["tasks_seen"], 2);
    assert_eq!(json["data"]["recalculation"]["time_remaining_reset"], 1);

    let json = body_json(get(app.clone(), &format!("/api/v1/tasks/{auto_task}")).await).await;
    assert_eq!(json["data"]["technical_load"], 2.0);
    assert_eq!(json["data"]["time_remaining"], 2.0);
    assert_eq!(json["data"]["delta"], 0.0);

    let json = body_json(get(app, &format!("/api/v1/tasks/{manual_task}")).await).await;
    assert_eq!(json["data"]["technical_load"], 2.0);
    assert_eq!(json["data"]["time_remaining"], 1.0);
    assert_eq!(json["data"]["delta"], 1.0);
}

// ---------------------------------------------------------------------------
// Test: project updates without a ratio change skip the task pass
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rename_does_not_recalculate() {
    let app = build_test_app(Arc::new(MemoryStore::new()));
    let project = create_project(&app, None, 2.0).await;

    let response = put_json(
        app,
        "/api/v1/projects/update",
        json!({ "id": project, "name": "Artemis" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["project"]["name"], "Artemis");
    assert!(json["data"]["recalculation"].is_null());
}

// ---------------------------------------------------------------------------
// Test: invalid ratios are rejected before anything is written
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_positive_ratio_is_a_validation_error() {
    let app = build_test_app(Arc::new(MemoryStore::new()));
    let project = create_project(&app, None, 2.0).await;

    let response = put_json(
        app.clone(),
        "/api/v1/projects/update",
        json!({ "id": project, "workload_ratio": 0.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json(
        app,
        "/api/v1/projects",
        json!({ "name": "Bad", "workload_ratio": -1.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: store failures during an update surface as 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn persistence_failure_on_update_is_a_bad_request() {
    let store = Arc::new(MemoryStore::new());
    let app = build_test_app(store.clone());
    let project = create_project(&app, None, 2.0).await;
    let sprint = create_sprint(&app, &project, "Sprint 1").await;
    let task = create_task(&app, &sprint, 10.0).await;

    let task_id = sprintboard_core::types::EntityId::parse(&task).unwrap();
    store.fail_saves_for(&task_id).await;

    let response = put_json(
        app,
        "/api/v1/projects/update",
        json!({ "id": project, "workload_ratio": 5.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
