//! Route definitions for the `/projects` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST   /                      -> create
/// PUT    /update                -> update
/// GET    /{id}                  -> get_by_id
/// DELETE /{id}                  -> delete
/// GET    /{id}/cascade-deleted  -> cascade_deleted
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(projects::create))
        .route("/update", put(projects::update))
        .route("/{id}", get(projects::get_by_id).delete(projects::delete))
        .route("/{id}/cascade-deleted", get(projects::cascade_deleted))
}
