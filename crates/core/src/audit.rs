//! Operation log vocabulary.
//!
//! This module lives in `core` (zero internal deps) so both the API layer
//! and any future CLI tooling name operations and modules consistently. The
//! `detail` column stays free text -- a human-readable narrative, not a
//! machine-replayable event log -- but the tags are a fixed vocabulary so
//! the trail can be filtered.

/// Known operation tags for audit entries.
pub mod operations {
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const CREATE: &str = "create";
    pub const EDIT: &str = "edit";
    pub const DELETE: &str = "delete";
    pub const APPROVE: &str = "approve";
    pub const REJECT: &str = "reject";
    pub const STATUS_CHANGE: &str = "status_change";
    pub const RATE_UPDATE: &str = "rate_update";
}

/// Known module tags for audit entries.
pub mod modules {
    pub const AUTH: &str = "auth";
    pub const USER: &str = "user";
    pub const PROJECT: &str = "project";
    pub const WORK_LOG: &str = "work_log";
    pub const EXPENSE: &str = "expense";
    pub const TASK: &str = "task";
    pub const CUSTOM_FIELD: &str = "custom_field";
}

/// Compose the detail line for an expense decision.
///
/// Approval/rejection entries always name the expense and its amount.
pub fn expense_decision_detail(operation: &str, title: &str, amount: f64) -> String {
    format!("{operation} expense '{title}' ({amount:.2})")
}

/// Compose the description of a delegate's follow-up task: the approved
/// amount plus the approver's comment when one was left.
pub fn delegate_task_description(title: &str, amount: f64, comment: Option<&str>) -> String {
    match comment {
        Some(note) if !note.trim().is_empty() => {
            format!("Approved expense '{title}' ({amount:.2}). Note: {note}")
        }
        _ => format!("Approved expense '{title}' ({amount:.2})"),
    }
}
