use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use sprintboard_core::models::EntityKind;
use sprintboard_core::store::Filter;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    store_healthy: bool,
}

/// GET /health -- liveness plus a cheap store round-trip.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = match state
        .store
        .count(EntityKind::ServiceCenter, &Filter::active())
        .await
    {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Store health probe failed");
            false
        }
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
