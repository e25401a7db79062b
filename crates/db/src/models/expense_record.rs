//! Project expense record entity model.

use devledger_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A derived ledger row, auto-created when an expense tied to a project is
/// approved: one record per expense item. Never written by hand.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectExpenseRecord {
    pub id: DbId,
    pub project_id: DbId,
    pub expense_id: DbId,
    pub category: String,
    pub amount: f64,
    pub description: String,
    /// The approving manager.
    pub recorded_by: DbId,
    pub recorded_at: Timestamp,
}

/// DTO for inserting a record inside the approval transaction.
#[derive(Debug, Clone)]
pub struct CreateExpenseRecord {
    pub project_id: DbId,
    pub expense_id: DbId,
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub recorded_by: DbId,
}
