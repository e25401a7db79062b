//! Task entity model and DTOs.

use devledger_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A unit of follow-up work, optionally spawned from expense approval.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Free-form tag, e.g. `"expense_process"` for approval follow-ups.
    pub task_type: Option<String>,
    pub assigned_to: DbId,
    pub assigned_by: DbId,
    pub expense_id: Option<DbId>,
    /// `"pending"`, `"in_progress"`, `"done"`, or `"cancelled"`.
    pub status: String,
    /// `"low"`, `"normal"`, `"high"`, or `"urgent"`.
    pub priority: String,
    pub due_date: Option<Date>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a task. The creator comes from the session.
#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub task_type: Option<String>,
    pub assigned_to: DbId,
    pub expense_id: Option<DbId>,
    /// Defaults to `"normal"` when omitted.
    pub priority: Option<String>,
    pub due_date: Option<Date>,
}

/// Status update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatus {
    pub status: String,
}
