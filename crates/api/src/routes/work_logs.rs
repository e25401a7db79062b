//! Route definitions for the `/work-logs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::work_logs;
use crate::state::AppState;

/// Routes mounted at `/work-logs`.
///
/// ```text
/// GET  /  -> list (role-scoped)
/// POST /  -> create (developer only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(work_logs::list).post(work_logs::create))
}
