//! Role/ownership authorization policy.
//!
//! Authorization is a single pure function `can(actor, action)` instead of
//! ad-hoc boolean checks scattered through handlers, so the rules can be
//! tested without any request machinery. Actions that depend on a resource
//! carry the relevant ownership/state facts in the variant.

use crate::expense;
use crate::roles::{ROLE_DEVELOPER, ROLE_MANAGER};
use crate::types::DbId;

/// The authenticated identity making a request.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: DbId,
    pub role: String,
}

impl Actor {
    pub fn is_manager(&self) -> bool {
        self.role == ROLE_MANAGER
    }

    pub fn is_developer(&self) -> bool {
        self.role == ROLE_DEVELOPER
    }
}

/// An action an actor may attempt. Resource-dependent variants carry the
/// facts the policy needs (submitter, assignee, current status).
#[derive(Debug, Clone)]
pub enum Action {
    CreateProject,
    ViewProjectDetail,
    EditProject,
    UpdateProjectStatus,
    UpdateAssignmentRate,
    CreateUser,
    ListUsers,
    /// Developers record their own hours.
    LogWork,
    /// Any authenticated user may submit an expense.
    SubmitExpense,
    /// View an expense: managers see all, submitters see their own.
    ViewExpense { submitter_id: DbId },
    /// Approve or reject a pending expense.
    DecideExpense,
    /// Edit an expense: submitter only, and only while pending.
    EditExpense { submitter_id: DbId, status: String },
    /// Delete an expense: submitter only, and only while pending.
    DeleteExpense { submitter_id: DbId, status: String },
    CreateTask,
    /// Update a task's status: managers, or the assignee.
    UpdateTaskStatus { assigned_to: DbId },
    ManageCustomFields,
    QueryOperationLogs,
}

/// Whether `actor` is allowed to perform `action`.
pub fn can(actor: &Actor, action: &Action) -> bool {
    match action {
        Action::CreateProject
        | Action::ViewProjectDetail
        | Action::EditProject
        | Action::UpdateProjectStatus
        | Action::UpdateAssignmentRate
        | Action::CreateUser
        | Action::ListUsers
        | Action::DecideExpense
        | Action::ManageCustomFields
        | Action::QueryOperationLogs => actor.is_manager(),

        Action::LogWork => actor.is_developer(),

        Action::SubmitExpense | Action::CreateTask => true,

        Action::ViewExpense { submitter_id } => {
            actor.is_manager() || actor.id == *submitter_id
        }

        Action::EditExpense {
            submitter_id,
            status,
        }
        | Action::DeleteExpense {
            submitter_id,
            status,
        } => actor.id == *submitter_id && expense::is_mutable(status),

        Action::UpdateTaskStatus { assigned_to } => {
            actor.is_manager() || actor.id == *assigned_to
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::{STATUS_APPROVED, STATUS_PENDING};

    fn manager() -> Actor {
        Actor {
            id: 1,
            role: ROLE_MANAGER.to_string(),
        }
    }

    fn developer(id: DbId) -> Actor {
        Actor {
            id,
            role: ROLE_DEVELOPER.to_string(),
        }
    }

    #[test]
    fn test_manager_only_actions() {
        let actions = [
            Action::CreateProject,
            Action::EditProject,
            Action::UpdateAssignmentRate,
            Action::CreateUser,
            Action::DecideExpense,
            Action::ManageCustomFields,
            Action::QueryOperationLogs,
        ];
        for action in &actions {
            assert!(can(&manager(), action), "{action:?} allowed for manager");
            assert!(
                !can(&developer(2), action),
                "{action:?} refused for developer"
            );
        }
    }

    #[test]
    fn test_only_developers_log_work() {
        assert!(can(&developer(2), &Action::LogWork));
        assert!(!can(&manager(), &Action::LogWork));
    }

    #[test]
    fn test_anyone_submits_expenses() {
        assert!(can(&manager(), &Action::SubmitExpense));
        assert!(can(&developer(2), &Action::SubmitExpense));
    }

    #[test]
    fn test_expense_visibility() {
        let view_own = Action::ViewExpense { submitter_id: 2 };
        assert!(can(&developer(2), &view_own));
        assert!(can(&manager(), &view_own));
        assert!(!can(&developer(3), &view_own));
    }

    #[test]
    fn test_expense_edit_requires_owner_and_pending() {
        let own_pending = Action::EditExpense {
            submitter_id: 2,
            status: STATUS_PENDING.to_string(),
        };
        assert!(can(&developer(2), &own_pending));
        // Not the submitter.
        assert!(!can(&developer(3), &own_pending));
        // Managers do not edit other people's expenses either.
        assert!(!can(&manager(), &own_pending));

        let own_decided = Action::EditExpense {
            submitter_id: 2,
            status: STATUS_APPROVED.to_string(),
        };
        assert!(!can(&developer(2), &own_decided));
    }

    #[test]
    fn test_task_status_by_assignee_or_manager() {
        let action = Action::UpdateTaskStatus { assigned_to: 2 };
        assert!(can(&developer(2), &action));
        assert!(can(&manager(), &action));
        assert!(!can(&developer(3), &action));
    }
}
