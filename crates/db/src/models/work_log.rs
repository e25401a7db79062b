//! Work log entity model and DTOs.

use devledger_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A dated record of hours a developer spent on a project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkLog {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub date: Date,
    pub hours: f64,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// Work log joined with the author's username, used by the costing engine
/// and list views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkLogWithUser {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub username: String,
    pub date: Date,
    pub hours: f64,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for recording hours. The author comes from the session, not the body.
#[derive(Debug, Deserialize)]
pub struct CreateWorkLog {
    pub project_id: DbId,
    pub date: Date,
    pub hours: f64,
    pub description: Option<String>,
}
