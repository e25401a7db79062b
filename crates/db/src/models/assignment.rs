//! Project assignment entity model and DTOs.

use devledger_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A developer-to-project assignment carrying the billing rate.
///
/// Unique per (project, user): enforced by
/// `uq_project_assignments_project_user`. The rate is manager-only data --
/// strip it from responses shown to developers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectAssignment {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub hourly_rate: Option<f64>,
    pub assigned_at: Timestamp,
}

/// Assignment joined with the developer's username for display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentWithUser {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub hourly_rate: Option<f64>,
    pub assigned_at: Timestamp,
}

/// Rate update payload. `hourly_rate: None` clears the rate.
#[derive(Debug, Deserialize)]
pub struct UpdateRate {
    pub hourly_rate: Option<f64>,
}
