//! Route definitions for the `/operation-logs` resource (manager only).

use axum::routing::get;
use axum::Router;

use crate::handlers::operation_logs;
use crate::state::AppState;

/// Routes mounted at `/operation-logs`.
///
/// ```text
/// GET /  -> list (filtered, paginated)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(operation_logs::list))
}
