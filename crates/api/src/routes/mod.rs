pub mod activities;
pub mod health;
pub mod projects;
pub mod service_centers;
pub mod sprints;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /service-centers                         create
/// /service-centers/{id}                    get, delete (cascade)
/// /service-centers/{id}/cascade-deleted    cascade audit
///
/// /projects                                create (seeds default activities)
/// /projects/update                         update (ratio change recalculates tasks)
/// /projects/{id}                           get, delete (cascade)
/// /projects/{id}/cascade-deleted           cascade audit
///
/// /sprints                                 create
/// /sprints/{id}                            get, delete (cascade)
/// /sprints/{id}/metrics                    sprint KPIs
/// /sprints/{id}/cascade-deleted            cascade audit
/// /sprints/{id}/activities                 book a sprint activity
///
/// /tasks                                   create
/// /tasks/update                            update
/// /tasks/{id}                              get, delete
///
/// /transversal-activities/{id}             delete (sprint or project level)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/service-centers", service_centers::router())
        .nest("/projects", projects::router())
        .nest("/sprints", sprints::router())
        .nest("/tasks", tasks::router())
        .nest("/transversal-activities", activities::router())
}
