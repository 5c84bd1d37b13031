pub mod activities;
pub mod projects;
pub mod service_centers;
pub mod sprints;
pub mod tasks;

use axum::Json;

use crate::error::{AppError, AppResult};
use crate::response::DeleteStatus;

/// Turn an engine delete outcome into the HTTP answer: `false` is a 404.
pub(crate) fn delete_outcome(
    deleted: bool,
    entity: &'static str,
    id: String,
) -> AppResult<Json<DeleteStatus>> {
    if deleted {
        Ok(Json(DeleteStatus::deleted(entity)))
    } else {
        Err(AppError::Core(
            sprintboard_core::error::CoreError::NotFound { entity, id },
        ))
    }
}
