//! Handlers for the `/work-logs` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use devledger_core::audit::{modules, operations};
use devledger_core::error::CoreError;
use devledger_core::policy::{can, Action};
use devledger_db::models::work_log::{CreateWorkLog, WorkLog, WorkLogWithUser};
use devledger_db::repositories::{AssignmentRepo, WorkLogRepo};

use crate::audit::log_operation;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/work-logs (developer only)
///
/// Requires an assignment on the target project: unassigned hours would be
/// invisible to costing (no rate row) and are refused outright.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateWorkLog>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkLog>>)> {
    if !can(&user.actor(), &Action::LogWork) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only developers log work hours".into(),
        )));
    }

    if input.hours <= 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Hours must be positive".into(),
        )));
    }

    let assigned = AssignmentRepo::exists(&state.pool, input.project_id, user.user_id).await?;
    if !assigned {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not assigned to this project".into(),
        )));
    }

    let work_log = WorkLogRepo::create(&state.pool, user.user_id, &input).await?;

    tracing::info!(
        work_log_id = work_log.id,
        project_id = work_log.project_id,
        hours = work_log.hours,
        "Work log recorded"
    );

    log_operation(
        &state.pool,
        &user,
        operations::CREATE,
        modules::WORK_LOG,
        format!(
            "logged {:.1}h on project {} for {}",
            work_log.hours, work_log.project_id, work_log.date
        ),
        Some("work_log"),
        Some(work_log.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: work_log })))
}

/// GET /api/v1/work-logs
///
/// Developers see their own logs; managers see everything.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<WorkLogWithUser>>>> {
    let logs = if user.actor().is_manager() {
        WorkLogRepo::list_all(&state.pool).await?
    } else {
        WorkLogRepo::list_for_user(&state.pool, user.user_id).await?
    };
    Ok(Json(DataResponse { data: logs }))
}
