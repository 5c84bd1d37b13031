//! Handlers for the `/sprints` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sprintboard_core::cascade::CascadeAudit;
use sprintboard_core::error::CoreError;
use sprintboard_core::metrics::{sprint_metrics, SprintMetrics};
use sprintboard_core::models::{
    CreateSprint, CreateSprintActivity, ParentRef, Project, Sprint, SprintTransversalActivity, Task,
};
use sprintboard_core::store::{Filter, StoreExt};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::delete_outcome;
use crate::response::{DataResponse, DeleteStatus};
use crate::state::AppState;

/// POST /api/v1/sprints
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateSprint>,
) -> AppResult<(StatusCode, Json<DataResponse<Sprint>>)> {
    input.validate().map_err(CoreError::from)?;

    let mut project: Project = state
        .store
        .find_record(&Filter::by_id(input.project_id.clone()))
        .await?
        .ok_or_else(|| CoreError::not_found("Project", &input.project_id))?;

    let sprint = state.store.save_record(input.into_sprint()).await?;
    project.sprints.push(sprint.id.clone());
    state.store.save_record(project).await?;

    tracing::info!(sprint_id = %sprint.id, project_id = %sprint.project_id, "Sprint created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: sprint })))
}

/// GET /api/v1/sprints/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Sprint>>> {
    let sprint = find_sprint(&state, id).await?;
    Ok(Json(DataResponse { data: sprint }))
}

/// GET /api/v1/sprints/{id}/metrics
///
/// KPIs over the sprint's live tasks and activities.
pub async fn metrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<SprintMetrics>>> {
    let sprint = find_sprint(&state, id).await?;
    let filter = Filter::child_of(ParentRef::Sprint(sprint.id.clone()));
    let tasks: Vec<Task> = state.store.find_records(&filter).await?;
    let activities: Vec<SprintTransversalActivity> = state.store.find_records(&filter).await?;

    let metrics = sprint_metrics(&sprint, &activities, &tasks);
    Ok(Json(DataResponse { data: metrics }))
}

/// DELETE /api/v1/sprints/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteStatus>> {
    let deleted = state.cascade().delete_sprint_with_cascade(&id, false).await;
    delete_outcome(deleted, "Sprint", id)
}

/// GET /api/v1/sprints/{id}/cascade-deleted
pub async fn cascade_deleted(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<CascadeAudit>>> {
    let audit = state
        .cascade()
        .cascade_deleted_elements("sprint", &id)
        .await?;
    Ok(Json(DataResponse { data: audit }))
}

/// POST /api/v1/sprints/{id}/activities
///
/// Books time on a transversal activity of the sprint.
pub async fn add_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateSprintActivity>,
) -> AppResult<(StatusCode, Json<DataResponse<SprintTransversalActivity>>)> {
    input.validate().map_err(CoreError::from)?;
    let mut sprint = find_sprint(&state, id).await?;

    let mut activity = SprintTransversalActivity::new(sprint.id.clone(), input.name, input.time_spent);
    activity.description = input.description;
    let activity = state.store.save_record(activity).await?;

    sprint.transversal_activities.push(activity.id.clone());
    state.store.save_record(sprint).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: activity })))
}

// ── Private helpers ──────────────────────────────────────────────────

async fn find_sprint(state: &AppState, id: String) -> AppResult<Sprint> {
    state
        .store
        .find_active_by_raw_id::<Sprint>(&id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Sprint",
            id,
        }))
}
