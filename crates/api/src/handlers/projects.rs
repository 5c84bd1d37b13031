//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sprintboard_core::cascade::CascadeAudit;
use sprintboard_core::error::CoreError;
use sprintboard_core::models::{
    CreateProject, Project, ProjectTransversalActivity, ProjectUpdate, Record, ServiceCenter,
};
use sprintboard_core::recalculation::ProjectUpdateOutcome;
use sprintboard_core::store::{Filter, StoreExt};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::delete_outcome;
use crate::response::{DataResponse, DeleteStatus};
use crate::state::AppState;

/// POST /api/v1/projects
///
/// Creates the project with its own copy of the default transversal
/// activities and links it into its service center, if any.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.validate().map_err(CoreError::from)?;

    let center = match &input.center_id {
        Some(center_id) => Some(
            state
                .store
                .find_record::<ServiceCenter>(&Filter::by_id(center_id.clone()))
                .await?
                .ok_or_else(|| CoreError::not_found("ServiceCenter", center_id))?,
        ),
        None => None,
    };

    let mut project = input.into_project();
    let activities = ProjectTransversalActivity::defaults_for(&project.id);
    project.transversal_activities = activities.iter().map(|a| a.id.clone()).collect();

    state
        .store
        .save_all(activities.into_iter().map(Record::into_entity).collect())
        .await?;
    let project = state.store.save_record(project).await?;

    if let Some(mut center) = center {
        center.projects.push(project.id.clone());
        state.store.save_record(center).await?;
    }

    tracing::info!(
        project_id = %project.id,
        workload_ratio = project.workload_ratio,
        activities = project.transversal_activities.len(),
        "Project created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state
        .store
        .find_active_by_raw_id::<Project>(&id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/update
///
/// A changed `workload_ratio` recalculates every live task of the project.
pub async fn update(
    State(state): State<AppState>,
    Json(input): Json<ProjectUpdate>,
) -> AppResult<Json<DataResponse<ProjectUpdateOutcome>>> {
    let outcome = state
        .recalculation()
        .update_project(input)
        .await
        .map_err(AppError::from_update)?;
    Ok(Json(DataResponse { data: outcome }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteStatus>> {
    let deleted = state.cascade().delete_project_with_cascade(&id, false).await;
    delete_outcome(deleted, "Project", id)
}

/// GET /api/v1/projects/{id}/cascade-deleted
pub async fn cascade_deleted(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<CascadeAudit>>> {
    let audit = state
        .cascade()
        .cascade_deleted_elements("project", &id)
        .await?;
    Ok(Json(DataResponse { data: audit }))
}
