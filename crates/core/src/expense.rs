//! Expense approval state machine and item category vocabulary.
//!
//! An expense starts `pending` and moves exactly once to `approved` or
//! `rejected`; both are terminal. Edits and deletions are only permitted
//! while pending. The side effects of approval (expense records, follow-up
//! task) are orchestrated by the API layer; this module only decides which
//! transitions are legal.

/// Awaiting a manager decision. The only state that permits edits/deletion.
pub const STATUS_PENDING: &str = "pending";

/// Approved by a manager. Terminal.
pub const STATUS_APPROVED: &str = "approved";

/// Rejected by a manager. Terminal.
pub const STATUS_REJECTED: &str = "rejected";

/// All valid expense statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_APPROVED, STATUS_REJECTED];

/// Validate that an expense status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), String> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid expense status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        ))
    }
}

/// Whether the state machine permits moving from `from` to `to`.
///
/// Only `pending -> approved` and `pending -> rejected` are legal;
/// approved and rejected are terminal.
pub fn can_transition(from: &str, to: &str) -> bool {
    from == STATUS_PENDING && (to == STATUS_APPROVED || to == STATUS_REJECTED)
}

/// Whether an expense in this state may still be edited or deleted.
pub fn is_mutable(status: &str) -> bool {
    status == STATUS_PENDING
}

// ---------------------------------------------------------------------------
// Item categories
// ---------------------------------------------------------------------------

pub const CATEGORY_TRAVEL: &str = "travel";
pub const CATEGORY_MEALS: &str = "meals";
pub const CATEGORY_ACCOMMODATION: &str = "accommodation";
pub const CATEGORY_TRANSPORT: &str = "transport";
pub const CATEGORY_OFFICE: &str = "office";
pub const CATEGORY_OTHER: &str = "other";

/// Closed vocabulary of expense item categories.
pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_TRAVEL,
    CATEGORY_MEALS,
    CATEGORY_ACCOMMODATION,
    CATEGORY_TRANSPORT,
    CATEGORY_OFFICE,
    CATEGORY_OTHER,
];

/// Validate that an item category is one of the accepted values.
pub fn validate_category(category: &str) -> Result<(), String> {
    if VALID_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(format!(
            "Invalid expense category '{category}'. Must be one of: {}",
            VALID_CATEGORIES.join(", ")
        ))
    }
}

/// Compose the ledger description for an auto-created expense record.
///
/// `"<expense title> - <item name>"`, used by the approval workflow when it
/// fans an approved expense out into one record per item.
pub fn record_description(expense_title: &str, item_name: &str) -> String {
    format!("{expense_title} - {item_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_can_be_decided() {
        assert!(can_transition(STATUS_PENDING, STATUS_APPROVED));
        assert!(can_transition(STATUS_PENDING, STATUS_REJECTED));
    }

    #[test]
    fn test_decided_states_are_terminal() {
        for from in [STATUS_APPROVED, STATUS_REJECTED] {
            for to in VALID_STATUSES {
                assert!(!can_transition(from, to), "{from} -> {to} must be refused");
            }
        }
    }

    #[test]
    fn test_no_self_transition() {
        assert!(!can_transition(STATUS_PENDING, STATUS_PENDING));
    }

    #[test]
    fn test_mutability_follows_pending() {
        assert!(is_mutable(STATUS_PENDING));
        assert!(!is_mutable(STATUS_APPROVED));
        assert!(!is_mutable(STATUS_REJECTED));
    }

    #[test]
    fn test_status_vocabulary() {
        assert!(validate_status(STATUS_PENDING).is_ok());
        assert!(validate_status("draft").is_err());
    }

    #[test]
    fn test_category_vocabulary() {
        assert!(validate_category(CATEGORY_TRAVEL).is_ok());
        assert!(validate_category("entertainment").is_err());
    }

    #[test]
    fn test_record_description_composition() {
        assert_eq!(
            record_description("Client visit", "Train tickets"),
            "Client visit - Train tickets"
        );
    }
}
