//! Route definitions for the `/custom-fields` resource (manager only).

use axum::routing::get;
use axum::Router;

use crate::handlers::custom_fields;
use crate::state::AppState;

/// Routes mounted at `/custom-fields`.
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(custom_fields::list).post(custom_fields::create))
        .route(
            "/{id}",
            axum::routing::put(custom_fields::update).delete(custom_fields::delete),
        )
}
