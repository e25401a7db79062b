//! Handlers for the `/auth` resource (login, logout).

use axum::extract::State;
use axum::Json;
use devledger_core::audit::{modules, operations};
use devledger_core::error::CoreError;
use devledger_core::types::DbId;
use devledger_db::models::user::LoginRequest;
use devledger_db::repositories::UserRepo;
use serde::Serialize;

use crate::audit::log_operation;
use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Successful authentication response returned by login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub role: String,
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    let access_token = generate_access_token(user.id, &user.username, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    let actor = AuthUser {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role.clone(),
    };
    log_operation(
        &state.pool,
        &actor,
        operations::LOGIN,
        modules::AUTH,
        format!("user '{}' logged in", user.username),
        None,
        None,
    )
    .await;

    Ok(Json(DataResponse {
        data: AuthResponse {
            access_token,
            expires_in: state.config.jwt.access_token_expiry_mins * 60,
            user: UserInfo {
                id: user.id,
                username: user.username,
                role: user.role,
            },
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// Stateless tokens cannot be revoked server-side; this endpoint exists to
/// record the logout in the operation trail.
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<()>>> {
    log_operation(
        &state.pool,
        &user,
        operations::LOGOUT,
        modules::AUTH,
        format!("user '{}' logged out", user.username),
        None,
        None,
    )
    .await;

    Ok(Json(DataResponse { data: () }))
}
