use axum::routing::delete;
use axum::Router;

use crate::handlers::activities;
use crate::state::AppState;

/// Routes mounted at `/transversal-activities`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(activities::delete))
}
