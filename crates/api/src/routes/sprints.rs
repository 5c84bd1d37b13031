//! Route definitions for the `/sprints` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sprints;
use crate::state::AppState;

/// Routes mounted at `/sprints`.
///
/// ```text
/// POST   /                      -> create
/// GET    /{id}                  -> get_by_id
/// DELETE /{id}                  -> delete
/// GET    /{id}/metrics          -> metrics
/// GET    /{id}/cascade-deleted  -> cascade_deleted
/// POST   /{id}/activities       -> add_activity
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sprints::create))
        .route("/{id}", get(sprints::get_by_id).delete(sprints::delete))
        .route("/{id}/metrics", get(sprints::metrics))
        .route("/{id}/cascade-deleted", get(sprints::cascade_deleted))
        .route("/{id}/activities", post(sprints::add_activity))
}
