//! Handlers for the `/service-centers` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sprintboard_core::cascade::CascadeAudit;
use sprintboard_core::error::CoreError;
use sprintboard_core::models::{CreateServiceCenter, ServiceCenter};
use sprintboard_core::store::StoreExt;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::delete_outcome;
use crate::response::{DataResponse, DeleteStatus};
use crate::state::AppState;

/// POST /api/v1/service-centers
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateServiceCenter>,
) -> AppResult<(StatusCode, Json<DataResponse<ServiceCenter>>)> {
    input.validate().map_err(CoreError::from)?;
    let center = state.store.save_record(input.into_service_center()).await?;
    tracing::info!(center_id = %center.id, "Service center created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: center })))
}

/// GET /api/v1/service-centers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<ServiceCenter>>> {
    let center = state
        .store
        .find_active_by_raw_id::<ServiceCenter>(&id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ServiceCenter",
            id,
        }))?;
    Ok(Json(DataResponse { data: center }))
}

/// DELETE /api/v1/service-centers/{id}
///
/// Deletes the center and cascades through its projects.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteStatus>> {
    let deleted = state.cascade().delete_service_center_with_cascade(&id).await;
    delete_outcome(deleted, "ServiceCenter", id)
}

/// GET /api/v1/service-centers/{id}/cascade-deleted
pub async fn cascade_deleted(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<CascadeAudit>>> {
    let audit = state
        .cascade()
        .cascade_deleted_elements("service_center", &id)
        .await?;
    Ok(Json(DataResponse { data: audit }))
}
