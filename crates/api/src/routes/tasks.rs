//! Route definitions for the `/tasks` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET  /             -> list (role-scoped)
/// POST /             -> create
/// GET  /{id}         -> get_by_id
/// PUT  /{id}/status  -> update_status (assignee or manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list).post(tasks::create))
        .route("/{id}", get(tasks::get_by_id))
        .route("/{id}/status", put(tasks::update_status))
}
