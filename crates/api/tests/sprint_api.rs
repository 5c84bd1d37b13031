//! HTTP-level integration tests for sprint creation, activities and metrics.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_center, create_project, create_sprint, create_task, get,
    post_json, put_json,
};
use serde_json::json;
use sprintboard_core::store::MemoryStore;

// ---------------------------------------------------------------------------
// Test: project creation seeds activities and links the center
// ---------------------------------------------------------------------------

#[tokio::test]
async fn project_creation_seeds_default_activities() {
    let app = build_test_app(Arc::new(MemoryStore::new()));
    let center = create_center(&app, "North").await;
    let project = create_project(&app, Some(&center), 2.0).await;

    let json = body_json(get(app.clone(), &format!("/api/v1/projects/{project}")).await).await;
    assert_eq!(json["data"]["status"], "In progress");
    assert_eq!(
        json["data"]["transversal_activities"].as_array().unwrap().len(),
        10
    );

    let json = body_json(get(app, &format!("/api/v1/service-centers/{center}")).await).await;
    assert_eq!(json["data"]["projects"], json!([project]));
}

#[tokio::test]
async fn project_in_unknown_center_is_not_found() {
    let app = build_test_app(Arc::new(MemoryStore::new()));
    let response = post_json(
        app,
        "/api/v1/projects",
        json!({ "name": "Lost", "center_id": "0123456789abcdef01234567", "workload_ratio": 1.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: reversed sprint dates are accepted and counted over the swapped range
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reversed_sprint_dates_count_weekdays_between_them() {
    let app = build_test_app(Arc::new(MemoryStore::new()));
    let project = create_project(&app, None, 1.0).await;

    let response = post_json(
        app.clone(),
        "/api/v1/sprints",
        json!({
            "project_id": project,
            "name": "Backwards",
            "start_date": "2025-01-10T00:00:00Z",
            "due_date": "2025-01-06T00:00:00Z",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sprint = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = get(app, &format!("/api/v1/sprints/{sprint}/metrics")).await;
    assert_eq!(response.status(), StatusCode::OK);
    // Friday back to Monday of the same week.
    assert_eq!(body_json(response).await["data"]["duration"], 5);
}

// ---------------------------------------------------------------------------
// Test: an empty sprint reports full progress and zero elsewhere
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_sprint_metrics() {
    let app = build_test_app(Arc::new(MemoryStore::new()));
    let project = create_project(&app, None, 1.0).await;
    let sprint = create_sprint(&app, &project, "Sprint 1").await;

    let response = get(app, &format!("/api/v1/sprints/{sprint}/metrics")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["duration"], 5);
    assert_eq!(json["data"]["progress"], 100.0);
    assert_eq!(json["data"]["scoped"], 0.0);
    assert_eq!(json["data"]["velocity"], 0.0);
    assert_eq!(json["data"]["otd"], 0.0);
    assert_eq!(json["data"]["oqd"], 0.0);
    assert_eq!(json["data"]["time_spent"], 0.0);
}

// ---------------------------------------------------------------------------
// Test: metrics over live tasks and booked activity time
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sprint_metrics_combine_tasks_and_activities() {
    let app = build_test_app(Arc::new(MemoryStore::new()));
    let project = create_project(&app, None, 2.0).await;
    let sprint = create_sprint(&app, &project, "Sprint 1").await;

    let started = create_task(&app, &sprint, 10.0).await;
    let response = put_json(
        app.clone(),
        "/api/v1/tasks/update",
        json!({ "id": started, "time_spent": 2.0, "time_remaining": 3.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app.clone(),
        "/api/v1/tasks",
        json!({ "sprint_id": sprint, "summary": "Shipped", "story_points": 4.0, "status": "DONE" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/sprints/{sprint}/activities"),
        json!({ "name": "Meetings", "time_spent": 1.5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(get(app, &format!("/api/v1/sprints/{sprint}/metrics")).await).await;
    assert_eq!(json["data"]["scoped"], 14.0);
    assert_eq!(json["data"]["velocity"], 4.0);
    // (10 * 40 + 4 * 0) / 14
    assert_eq!(json["data"]["progress"], 29.0);
    assert_eq!(json["data"]["time_spent"], 3.5);
    assert_eq!(json["data"]["transversal_time"], 1.5);
    // Sprint still open.
    assert_eq!(json["data"]["otd"], 0.0);
}

#[tokio::test]
async fn metrics_of_unknown_sprint_is_not_found() {
    let app = build_test_app(Arc::new(MemoryStore::new()));
    let response = get(app, "/api/v1/sprints/0123456789abcdef01234567/metrics").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
