//! Operation log entity model and DTOs.
//!
//! Append-only audit trail: entries are never updated or deleted, so there
//! is no update DTO and no `updated_at` column.

use devledger_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single operation log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OperationLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    /// Denormalized for display; survives actor deletion.
    pub username: String,
    pub operation: String,
    pub module: String,
    /// Human-readable narrative (often a change-list summary).
    pub detail: String,
    pub target_type: Option<String>,
    pub target_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for appending a log entry.
#[derive(Debug, Clone)]
pub struct CreateOperationLog {
    pub user_id: Option<DbId>,
    pub username: String,
    pub operation: String,
    pub module: String,
    pub detail: String,
    pub target_type: Option<String>,
    pub target_id: Option<DbId>,
}

/// Filter parameters for querying the trail.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationLogQuery {
    pub user_id: Option<DbId>,
    pub operation: Option<String>,
    pub module: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated response for operation log queries.
#[derive(Debug, Clone, Serialize)]
pub struct OperationLogPage {
    pub items: Vec<OperationLog>,
    pub total: i64,
}
