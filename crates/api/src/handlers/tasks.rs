//! Handlers for the `/tasks` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use devledger_core::audit::{modules, operations};
use devledger_core::error::CoreError;
use devledger_core::policy::{can, Action};
use devledger_core::status::{validate_task_priority, validate_task_status};
use devledger_core::types::DbId;
use devledger_db::models::task::{CreateTask, Task, UpdateTaskStatus};
use devledger_db::repositories::{TaskRepo, UserRepo};

use crate::audit::log_operation;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    if let Some(priority) = input.priority.as_deref() {
        validate_task_priority(priority)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    UserRepo::find_by_id(&state.pool, input.assigned_to)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.assigned_to,
        }))?;

    let task = TaskRepo::create(&state.pool, user.user_id, &input).await?;

    tracing::info!(
        task_id = task.id,
        assigned_to = task.assigned_to,
        priority = %task.priority,
        "Task created"
    );

    log_operation(
        &state.pool,
        &user,
        operations::CREATE,
        modules::TASK,
        format!("created task '{}' for user {}", task.title, task.assigned_to),
        Some("task"),
        Some(task.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks
///
/// Managers see every task; developers only the ones assigned to them.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let tasks = if user.actor().is_manager() {
        TaskRepo::list_all(&state.pool).await?
    } else {
        TaskRepo::list_for_assignee(&state.pool, user.user_id).await?
    };
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = find_task(&state, id).await?;

    if !user.actor().is_manager() && task.assigned_to != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only view tasks assigned to you".into(),
        )));
    }

    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}/status
///
/// Assignee or any manager; `done` stamps `completed_at`.
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTaskStatus>,
) -> AppResult<Json<DataResponse<Task>>> {
    validate_task_status(&input.status)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let task = find_task(&state, id).await?;

    if !can(
        &user.actor(),
        &Action::UpdateTaskStatus {
            assigned_to: task.assigned_to,
        },
    ) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the assignee or a manager may update this task".into(),
        )));
    }

    let updated = TaskRepo::update_status(&state.pool, id, &input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    log_operation(
        &state.pool,
        &user,
        operations::STATUS_CHANGE,
        modules::TASK,
        format!(
            "task '{}' status: {} -> {}",
            updated.title, task.status, updated.status
        ),
        Some("task"),
        Some(updated.id),
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

async fn find_task(state: &AppState, id: DbId) -> Result<Task, AppError> {
    TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))
}
