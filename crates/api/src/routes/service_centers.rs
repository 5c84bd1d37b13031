//! Route definitions for the `/service-centers` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::service_centers;
use crate::state::AppState;

/// Routes mounted at `/service-centers`.
///
/// ```text
/// POST   /                      -> create
/// GET    /{id}                  -> get_by_id
/// DELETE /{id}                  -> delete
/// GET    /{id}/cascade-deleted  -> cascade_deleted
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(service_centers::create))
        .route(
            "/{id}",
            get(service_centers::get_by_id).delete(service_centers::delete),
        )
        .route("/{id}/cascade-deleted", get(service_centers::cascade_deleted))
}
