//! Operation-log helpers shared by the handlers.
//!
//! Handlers that mutate inside a transaction use
//! [`OperationLogRepo::append_in_tx`] directly so the entry commits with the
//! change; everything else goes through [`log_operation`], which never fails
//! the request -- a lost log line is logged and swallowed.

use devledger_core::types::DbId;
use devledger_db::models::operation_log::CreateOperationLog;
use devledger_db::repositories::OperationLogRepo;
use devledger_db::DbPool;

use crate::middleware::auth::AuthUser;

/// Build a log entry for the given actor.
pub fn entry(
    user: &AuthUser,
    operation: &str,
    module: &str,
    detail: String,
    target_type: Option<&str>,
    target_id: Option<DbId>,
) -> CreateOperationLog {
    CreateOperationLog {
        user_id: Some(user.user_id),
        username: user.username.clone(),
        operation: operation.to_string(),
        module: module.to_string(),
        detail,
        target_type: target_type.map(str::to_string),
        target_id,
    }
}

/// Append an operation log entry outside any transaction.
///
/// Failures are traced, not propagated: the audited action already
/// succeeded and must not be reported as failed.
pub async fn log_operation(
    pool: &DbPool,
    user: &AuthUser,
    operation: &str,
    module: &str,
    detail: String,
    target_type: Option<&str>,
    target_id: Option<DbId>,
) {
    let log_entry = entry(user, operation, module, detail, target_type, target_id);
    if let Err(err) = OperationLogRepo::append(pool, &log_entry).await {
        tracing::error!(error = %err, operation, module, "Failed to append operation log");
    }
}
