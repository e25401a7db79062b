//! Field-level change tracking for project edits.
//!
//! An edit captures a snapshot of the mutable fields before the form input
//! is applied, then diffs old vs. new per field. Each difference becomes a
//! structured [`FieldChange`] (field, old, new) so tests and API consumers
//! can assert on data; the human-readable narrative for the audit trail is
//! composed from the same list by [`summarize`].

use std::collections::HashSet;

use serde::Serialize;

use crate::types::{Date, DbId};

/// Tolerance for money and numeric comparisons. Differences at or below this
/// are treated as floating-point noise, not changes.
pub const NUMERIC_TOLERANCE: f64 = 0.01;

/// Placeholder shown for unset values in change narratives.
const UNSET: &str = "-";

/// Marker detail recorded when an edit produced no field changes.
pub const NO_CHANGES: &str = "no changes";

/// A typed field value with field-specific formatting rules.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Date(Option<Date>),
    /// Formatted with two decimals; compared with [`NUMERIC_TOLERANCE`].
    Money(Option<f64>),
    /// Formatted as-is; compared with [`NUMERIC_TOLERANCE`].
    Number(Option<f64>),
    Bool(bool),
}

impl FieldValue {
    /// Render the value for display in a change narrative.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(Some(text)) if !text.is_empty() => text.clone(),
            FieldValue::Text(_) => UNSET.to_string(),
            FieldValue::Date(Some(date)) => date.format("%Y-%m-%d").to_string(),
            FieldValue::Date(None) => UNSET.to_string(),
            FieldValue::Money(Some(amount)) => format!("{amount:.2}"),
            FieldValue::Money(None) => UNSET.to_string(),
            FieldValue::Number(Some(number)) => {
                if (number.fract()).abs() < f64::EPSILON {
                    format!("{number:.0}")
                } else {
                    format!("{number}")
                }
            }
            FieldValue::Number(None) => UNSET.to_string(),
            FieldValue::Bool(true) => "yes".to_string(),
            FieldValue::Bool(false) => "no".to_string(),
        }
    }

    /// Whether two values are equal for diff purposes.
    fn same_as(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Money(a), FieldValue::Money(b))
            | (FieldValue::Number(a), FieldValue::Number(b)) => match (a, b) {
                (Some(a), Some(b)) => (a - b).abs() <= NUMERIC_TOLERANCE,
                (None, None) => true,
                // Unset vs. an effective zero is still a change; the edit
                // narrative should show "-" becoming "0.00".
                _ => false,
            },
            _ => self == other,
        }
    }
}

/// One changed field: the structured (field, old, new) record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub field: String,
    pub old: String,
    pub new: String,
}

/// Diff one field; `None` when the values are equal under the field's rules.
pub fn diff_field(field: &str, old: &FieldValue, new: &FieldValue) -> Option<FieldChange> {
    if old.same_as(new) {
        return None;
    }
    Some(FieldChange {
        field: field.to_string(),
        old: old.display(),
        new: new.display(),
    })
}

/// Developer (re)assignment as a set difference.
///
/// Returns `(added, removed)`: ids present in the new selection but not
/// currently assigned, and ids currently assigned but absent from the new
/// selection. Removed assignments lose their rate history (no soft delete).
pub fn assignment_diff(current: &[DbId], selected: &[DbId]) -> (Vec<DbId>, Vec<DbId>) {
    let current_set: HashSet<DbId> = current.iter().copied().collect();
    let selected_set: HashSet<DbId> = selected.iter().copied().collect();

    let mut added: Vec<DbId> = selected_set.difference(&current_set).copied().collect();
    let mut removed: Vec<DbId> = current_set.difference(&selected_set).copied().collect();
    added.sort_unstable();
    removed.sort_unstable();
    (added, removed)
}

/// Compose the human-readable change list for the audit trail.
///
/// One `field: old -> new` line per change; the [`NO_CHANGES`] marker when
/// the edit changed nothing.
pub fn summarize(changes: &[FieldChange]) -> String {
    if changes.is_empty() {
        return NO_CHANGES.to_string();
    }
    changes
        .iter()
        .map(|c| format!("{}: {} -> {}", c.field, c.old, c.new))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_number_change_detected() {
        assert_matches!(
            diff_field(
                "estimated_hours",
                &FieldValue::Number(Some(80.0)),
                &FieldValue::Number(Some(100.0)),
            ),
            Some(FieldChange { ref field, .. }) if field == "estimated_hours"
        );
    }

    #[test]
    fn test_text_change_detected() {
        let change = diff_field(
            "name",
            &FieldValue::Text(Some("Plant sim".into())),
            &FieldValue::Text(Some("Plant simulation".into())),
        )
        .expect("text change should be detected");
        assert_eq!(change.field, "name");
        assert_eq!(change.old, "Plant sim");
        assert_eq!(change.new, "Plant simulation");
    }

    #[test]
    fn test_equal_text_is_not_a_change() {
        assert!(diff_field(
            "name",
            &FieldValue::Text(Some("same".into())),
            &FieldValue::Text(Some("same".into())),
        )
        .is_none());
    }

    #[test]
    fn test_date_formatting() {
        let change = diff_field(
            "start_date",
            &FieldValue::Date(None),
            &FieldValue::Date(Some(date(2026, 3, 15))),
        )
        .unwrap();
        assert_eq!(change.old, "-");
        assert_eq!(change.new, "2026-03-15");
    }

    #[test]
    fn test_money_formatting_two_decimals() {
        let change = diff_field(
            "contract_amount_with_tax",
            &FieldValue::Money(Some(10000.0)),
            &FieldValue::Money(Some(12500.5)),
        )
        .unwrap();
        assert_eq!(change.old, "10000.00");
        assert_eq!(change.new, "12500.50");
    }

    #[test]
    fn test_money_tolerance_swallows_float_noise() {
        // A sub-cent wobble is noise, not an edit.
        assert!(diff_field(
            "payment_received",
            &FieldValue::Money(Some(4000.0)),
            &FieldValue::Money(Some(4000.004)),
        )
        .is_none());

        // Anything beyond a cent is a real change.
        assert!(diff_field(
            "payment_received",
            &FieldValue::Money(Some(4000.0)),
            &FieldValue::Money(Some(4000.02)),
        )
        .is_some());
    }

    #[test]
    fn test_unset_money_vs_zero_is_a_change() {
        let change = diff_field(
            "outsourcing_cost",
            &FieldValue::Money(None),
            &FieldValue::Money(Some(0.0)),
        )
        .unwrap();
        assert_eq!(change.old, "-");
        assert_eq!(change.new, "0.00");
    }

    #[test]
    fn test_bool_renders_yes_no() {
        let change = diff_field(
            "invoice_issued",
            &FieldValue::Bool(false),
            &FieldValue::Bool(true),
        )
        .unwrap();
        assert_eq!(change.old, "no");
        assert_eq!(change.new, "yes");
    }

    #[test]
    fn test_assignment_set_difference() {
        let (added, removed) = assignment_diff(&[1, 2, 3], &[2, 3, 4, 5]);
        assert_eq!(added, vec![4, 5]);
        assert_eq!(removed, vec![1]);
    }

    #[test]
    fn test_assignment_diff_no_changes() {
        let (added, removed) = assignment_diff(&[1, 2], &[2, 1]);
        assert!(added.is_empty());
        assert!(removed.is_empty());
    }

    #[test]
    fn test_summarize_joins_changes() {
        let changes = vec![
            FieldChange {
                field: "name".into(),
                old: "a".into(),
                new: "b".into(),
            },
            FieldChange {
                field: "status".into(),
                old: "initiating".into(),
                new: "in_progress".into(),
            },
        ];
        assert_eq!(
            summarize(&changes),
            "name: a -> b; status: initiating -> in_progress"
        );
    }

    #[test]
    fn test_summarize_empty_is_no_changes_marker() {
        assert_eq!(summarize(&[]), NO_CHANGES);
    }
}
