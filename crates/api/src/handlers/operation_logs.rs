//! Handlers for the `/operation-logs` resource.

use axum::extract::{Query, State};
use axum::Json;
use devledger_db::models::operation_log::{OperationLogPage, OperationLogQuery};
use devledger_db::repositories::OperationLogRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/operation-logs (manager only)
///
/// Filterable by actor, operation, module, and date range; paginated.
pub async fn list(
    State(state): State<AppState>,
    RequireManager(_manager): RequireManager,
    Query(params): Query<OperationLogQuery>,
) -> AppResult<Json<DataResponse<OperationLogPage>>> {
    let items = OperationLogRepo::query(&state.pool, &params).await?;
    let total = OperationLogRepo::count(&state.pool, &params).await?;

    Ok(Json(DataResponse {
        data: OperationLogPage { items, total },
    }))
}
