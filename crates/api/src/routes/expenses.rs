//! Route definitions for the `/expenses` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::expenses;
use crate::state::AppState;

/// Routes mounted at `/expenses`.
///
/// ```text
/// GET    /              -> list (role-scoped)
/// POST   /              -> create
/// GET    /{id}          -> get_by_id (submitter or manager)
/// PUT    /{id}          -> update (submitter, pending only)
/// DELETE /{id}          -> delete (submitter, pending only)
/// POST   /{id}/approve  -> approve (manager only)
/// POST   /{id}/reject   -> reject (manager only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(expenses::list).post(expenses::create))
        .route(
            "/{id}",
            get(expenses::get_by_id)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route("/{id}/approve", post(expenses::approve))
        .route("/{id}/reject", post(expenses::reject))
}
