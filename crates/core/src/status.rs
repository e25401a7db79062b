//! Status and priority vocabularies for projects and tasks.
//!
//! Statuses are stored as plain TEXT in the database; this module is the
//! single source of truth for the accepted values, their lifecycle order,
//! and the display colors consumed by the frontend.

/// Ordered project lifecycle. The position in this slice is the lifecycle
/// order (a project normally moves left to right, but backwards moves are
/// not rejected -- e.g. un-pausing).
pub const PROJECT_STATUSES: &[&str] = &[
    PROJECT_INITIATING,
    PROJECT_IN_PROGRESS,
    PROJECT_PAUSED,
    PROJECT_ACCEPTANCE,
    PROJECT_AWAITING_PAYMENT,
    PROJECT_SETTLEMENT,
    PROJECT_CLOSED,
];

pub const PROJECT_INITIATING: &str = "initiating";
pub const PROJECT_IN_PROGRESS: &str = "in_progress";
pub const PROJECT_PAUSED: &str = "paused";
pub const PROJECT_ACCEPTANCE: &str = "acceptance";
pub const PROJECT_AWAITING_PAYMENT: &str = "awaiting_payment";
pub const PROJECT_SETTLEMENT: &str = "settlement";
pub const PROJECT_CLOSED: &str = "closed";

/// Default status for newly created projects.
pub const PROJECT_STATUS_DEFAULT: &str = PROJECT_INITIATING;

/// Validate that a project status is one of the accepted values.
pub fn validate_project_status(status: &str) -> Result<(), String> {
    if PROJECT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid project status '{status}'. Must be one of: {}",
            PROJECT_STATUSES.join(", ")
        ))
    }
}

/// Position of a status in the lifecycle, for ordering in list views.
pub fn project_status_order(status: &str) -> Option<usize> {
    PROJECT_STATUSES.iter().position(|s| *s == status)
}

/// Display color (hex) for a project status badge.
///
/// Unknown statuses fall back to the neutral gray used for `initiating`.
pub fn project_status_color(status: &str) -> &'static str {
    match status {
        PROJECT_INITIATING => "#6c757d",
        PROJECT_IN_PROGRESS => "#007bff",
        PROJECT_PAUSED => "#ffc107",
        PROJECT_ACCEPTANCE => "#fd7e14",
        PROJECT_AWAITING_PAYMENT => "#28a745",
        PROJECT_SETTLEMENT => "#20c997",
        PROJECT_CLOSED => "#dc3545",
        _ => "#6c757d",
    }
}

// ---------------------------------------------------------------------------
// Task status
// ---------------------------------------------------------------------------

pub const TASK_PENDING: &str = "pending";
pub const TASK_IN_PROGRESS: &str = "in_progress";
pub const TASK_DONE: &str = "done";
pub const TASK_CANCELLED: &str = "cancelled";

/// All valid task statuses.
pub const TASK_STATUSES: &[&str] = &[TASK_PENDING, TASK_IN_PROGRESS, TASK_DONE, TASK_CANCELLED];

/// Task type tag used for tasks spawned by expense approval.
pub const TASK_TYPE_EXPENSE_PROCESS: &str = "expense_process";

/// Validate that a task status is one of the accepted values.
pub fn validate_task_status(status: &str) -> Result<(), String> {
    if TASK_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid task status '{status}'. Must be one of: {}",
            TASK_STATUSES.join(", ")
        ))
    }
}

/// Whether a task status counts as open (still needs attention).
pub fn task_is_open(status: &str) -> bool {
    status == TASK_PENDING || status == TASK_IN_PROGRESS
}

// ---------------------------------------------------------------------------
// Task priority
// ---------------------------------------------------------------------------

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_NORMAL: &str = "normal";
pub const PRIORITY_HIGH: &str = "high";
pub const PRIORITY_URGENT: &str = "urgent";

/// All valid task priorities, lowest first.
pub const TASK_PRIORITIES: &[&str] = &[PRIORITY_LOW, PRIORITY_NORMAL, PRIORITY_HIGH, PRIORITY_URGENT];

/// Validate that a task priority is one of the accepted values.
pub fn validate_task_priority(priority: &str) -> Result<(), String> {
    if TASK_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(format!(
            "Invalid task priority '{priority}'. Must be one of: {}",
            TASK_PRIORITIES.join(", ")
        ))
    }
}

/// Display color (hex) for a task priority badge.
pub fn task_priority_color(priority: &str) -> &'static str {
    match priority {
        PRIORITY_LOW => "#6c757d",
        PRIORITY_NORMAL => "#007bff",
        PRIORITY_HIGH => "#fd7e14",
        PRIORITY_URGENT => "#dc3545",
        _ => "#007bff",
    }
}
