//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement. Use these in route handlers to enforce
//! authorization at the type level. Finer-grained checks (ownership, state
//! preconditions) go through `devledger_core::policy::can` in the handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use devledger_core::error::CoreError;
use devledger_core::roles::ROLE_MANAGER;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `manager` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn manager_only(RequireManager(user): RequireManager) -> AppResult<Json<()>> {
///     // user is guaranteed to be a manager here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_MANAGER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Manager role required".into(),
            )));
        }
        Ok(RequireManager(user))
    }
}
