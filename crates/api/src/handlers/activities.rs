use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppResult;
use crate::handlers::delete_outcome;
use crate::response::DeleteStatus;
use crate::state::AppState;

/// DELETE /api/v1/transversal-activities/{id}
///
/// The id may name a sprint-level or a project-level activity.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteStatus>> {
    let deleted = state.cascade().delete_transversal_activity(&id, false).await;
    delete_outcome(deleted, "TransversalActivity", id)
}
