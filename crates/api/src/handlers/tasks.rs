//! Handlers for the `/tasks` resource.
//!
//! Writes go through the recalculation coordinator so derived fields are
//! always persisted together with the inputs they depend on.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sprintboard_core::error::CoreError;
use sprintboard_core::models::{NewTask, Task, TaskUpdate};
use sprintboard_core::store::StoreExt;

use crate::error::{AppError, AppResult};
use crate::handlers::delete_outcome;
use crate::response::{DataResponse, DeleteStatus};
use crate::state::AppState;

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    let task = state
        .recalculation()
        .create_task(input)
        .await
        .map_err(AppError::from_update)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = state
        .store
        .find_active_by_raw_id::<Task>(&id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/update
pub async fn update(
    State(state): State<AppState>,
    Json(input): Json<TaskUpdate>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = state
        .recalculation()
        .update_task(input)
        .await
        .map_err(AppError::from_update)?;
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteStatus>> {
    let deleted = state.cascade().delete_task(&id, false).await;
    delete_outcome(deleted, "Task", id)
}
