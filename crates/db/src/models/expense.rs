//! Expense and expense item entity models and DTOs.

use devledger_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An expense claim from the `expenses` table.
///
/// `project_id` is `None` for pre-sales/general expenses; those never
/// generate project expense records on approval.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Expense {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub title: String,
    pub expense_type: Option<String>,
    pub total_amount: f64,
    /// `"pending"`, `"approved"`, or `"rejected"`.
    pub status: String,
    pub submitted_at: Timestamp,
    pub approved_at: Option<Timestamp>,
    pub approved_by: Option<DbId>,
    pub approval_comment: Option<String>,
    pub created_at: Timestamp,
}

/// One line item under an expense.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExpenseItem {
    pub id: DbId,
    pub expense_id: DbId,
    pub category: String,
    pub item_name: String,
    pub amount: f64,
    pub expense_date: Date,
    pub receipt_path: Option<String>,
}

/// An expense together with its line items, the shape most read paths want.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseWithItems {
    #[serde(flatten)]
    pub expense: Expense,
    pub items: Vec<ExpenseItem>,
}

/// DTO for one submitted line item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpenseItem {
    pub category: String,
    pub item_name: String,
    pub amount: f64,
    pub expense_date: Date,
    pub receipt_path: Option<String>,
}

/// DTO for submitting an expense. The submitter comes from the session;
/// `total_amount` is computed as the sum of the items.
#[derive(Debug, Deserialize)]
pub struct CreateExpense {
    pub project_id: Option<DbId>,
    pub title: String,
    pub expense_type: Option<String>,
    pub items: Vec<CreateExpenseItem>,
}

/// DTO for editing a pending expense.
///
/// The edit form only exposes the first line item; remaining items keep
/// their stored values and the total is recomputed from all of them.
#[derive(Debug, Deserialize)]
pub struct UpdateExpense {
    pub project_id: Option<DbId>,
    pub title: String,
    pub expense_type: Option<String>,
    pub first_item: CreateExpenseItem,
}

/// Approval payload: optional comment and optional delegate for follow-up.
#[derive(Debug, Deserialize)]
pub struct ApproveExpense {
    pub comment: Option<String>,
    /// When set, a follow-up task of type `expense_process` is created and
    /// assigned to this user.
    pub delegate_user_id: Option<DbId>,
}

/// Rejection payload.
#[derive(Debug, Deserialize)]
pub struct RejectExpense {
    pub comment: Option<String>,
}
