//! Route definitions for the `/tasks` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// POST   /        -> create
/// PUT    /update  -> update
/// GET    /{id}    -> get_by_id
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(tasks::create))
        .route("/update", put(tasks::update))
        .route("/{id}", get(tasks::get_by_id).delete(tasks::delete))
}
