//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use devledger_core::audit::{modules, operations};
use devledger_core::error::CoreError;
use devledger_core::roles::validate_role;
use devledger_db::models::user::{CreateUser, RegisterUser, UserResponse};
use devledger_db::repositories::UserRepo;

use crate::audit::log_operation;
use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/users (manager only)
pub async fn create(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Json(input): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validate_role(&input.role).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // uq_users_username turns duplicates into a 409 via error classification.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            password_hash,
            role: input.role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User created");

    log_operation(
        &state.pool,
        &manager,
        operations::CREATE,
        modules::USER,
        format!("created user '{}' with role {}", user.username, user.role),
        Some("user"),
        Some(user.id),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: user.into() }),
    ))
}

/// GET /api/v1/users (manager only)
pub async fn list(
    State(state): State<AppState>,
    RequireManager(_manager): RequireManager,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse { data: row.into() }))
}
