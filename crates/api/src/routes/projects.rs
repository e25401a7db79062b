//! Route definitions for the `/projects` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{custom_fields, projects};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET  /                                    -> list (role-scoped)
/// POST /                                    -> create (manager only)
/// GET  /{id}                                -> get_detail (manager only)
/// PUT  /{id}                                -> update (manager only)
/// PUT  /{id}/status                         -> update_status (manager only)
/// GET  /{id}/custom-fields                  -> values_for_project (manager only)
/// PUT  /{project_id}/assignments/{id}/rate  -> update_assignment_rate (manager only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/{id}", get(projects::get_detail).put(projects::update))
        .route("/{id}/status", put(projects::update_status))
        .route("/{id}/custom-fields", get(custom_fields::values_for_project))
        .route(
            "/{project_id}/assignments/{id}/rate",
            put(projects::update_assignment_rate),
        )
}
