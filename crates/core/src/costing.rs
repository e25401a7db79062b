//! Project costing engine.
//!
//! Pure functions over plain data: callers fetch work logs, assignments, and
//! the approved-expense total once per project and pass them in. Rate lookups
//! are resolved through a single map built from the assignment list instead
//! of one query per work log.
//!
//! A developer's cost always uses the rate currently stored on the
//! assignment -- the rate is not frozen at log time, so editing an
//! assignment rate retroactively changes historical cost figures.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::types::DbId;

/// One work log entry, reduced to what costing needs.
#[derive(Debug, Clone)]
pub struct LoggedWork {
    pub user_id: DbId,
    pub username: String,
    pub hours: f64,
}

/// One project assignment, reduced to what costing needs.
///
/// `hourly_rate` is `None` when the manager has not set a rate yet; such
/// work is costed at zero.
#[derive(Debug, Clone)]
pub struct AssignedRate {
    pub user_id: DbId,
    pub hourly_rate: Option<f64>,
}

/// Per-developer cost breakdown row, keyed by username in [`developer_costs`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeveloperCost {
    pub hours: f64,
    pub rate: f64,
    pub cost: f64,
}

/// Sum of all logged hours on a project.
pub fn total_logged_hours(logs: &[LoggedWork]) -> f64 {
    logs.iter().map(|log| log.hours).sum()
}

/// Progress as a percentage of estimated hours, capped at 100.
///
/// Returns 0 when no estimate is set (or the estimate is zero or negative)
/// to avoid a divide-by-zero.
pub fn progress_percentage(logged_hours: f64, estimated_hours: Option<f64>) -> f64 {
    match estimated_hours {
        Some(estimated) if estimated > 0.0 => (logged_hours / estimated * 100.0).min(100.0),
        _ => 0.0,
    }
}

/// Build the user-id -> rate map used by the cost functions.
///
/// A missing assignment and an assignment without a rate both resolve to 0.
fn rate_map(rates: &[AssignedRate]) -> HashMap<DbId, f64> {
    rates
        .iter()
        .map(|r| (r.user_id, r.hourly_rate.unwrap_or(0.0)))
        .collect()
}

/// Per-developer {hours, rate, cost} breakdown, keyed by username.
///
/// `BTreeMap` so the breakdown table renders in a stable order.
pub fn developer_costs(
    logs: &[LoggedWork],
    rates: &[AssignedRate],
) -> BTreeMap<String, DeveloperCost> {
    let rates = rate_map(rates);
    let mut breakdown: BTreeMap<String, DeveloperCost> = BTreeMap::new();

    for log in logs {
        let rate = rates.get(&log.user_id).copied().unwrap_or(0.0);
        let entry = breakdown
            .entry(log.username.clone())
            .or_insert(DeveloperCost {
                hours: 0.0,
                rate,
                cost: 0.0,
            });
        entry.hours += log.hours;
        entry.cost += log.hours * rate;
    }

    breakdown
}

/// Total development cost: sum of hours x current assignment rate per log.
pub fn total_development_cost(logs: &[LoggedWork], rates: &[AssignedRate]) -> f64 {
    let rates = rate_map(rates);
    logs.iter()
        .map(|log| log.hours * rates.get(&log.user_id).copied().unwrap_or(0.0))
        .sum()
}

/// Total project cost: development + approved expenses + outsourcing + indirect.
///
/// Expenses still pending or rejected must not be included in
/// `approved_expense_total`; the caller queries only approved rows.
pub fn total_cost(
    development_cost: f64,
    approved_expense_total: f64,
    outsourcing_cost: Option<f64>,
    indirect_cost: Option<f64>,
) -> f64 {
    development_cost
        + approved_expense_total
        + outsourcing_cost.unwrap_or(0.0)
        + indirect_cost.unwrap_or(0.0)
}

/// Remaining contract balance, recomputed on every project create/update.
///
/// `contract_amount_with_tax - payment_received` when both are present,
/// the contract amount alone when no payment has been received, 0 otherwise.
pub fn remaining_amount(
    contract_amount_with_tax: Option<f64>,
    payment_received: Option<f64>,
) -> f64 {
    match (contract_amount_with_tax, payment_received) {
        (Some(contract), Some(received)) => contract - received,
        (Some(contract), None) => contract,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(user_id: DbId, username: &str, hours: f64) -> LoggedWork {
        LoggedWork {
            user_id,
            username: username.to_string(),
            hours,
        }
    }

    fn rate(user_id: DbId, hourly_rate: Option<f64>) -> AssignedRate {
        AssignedRate {
            user_id,
            hourly_rate,
        }
    }

    #[test]
    fn test_total_logged_hours() {
        let logs = vec![log(1, "dana", 30.0), log(1, "dana", 20.0)];
        assert_eq!(total_logged_hours(&logs), 50.0);
        assert_eq!(total_logged_hours(&[]), 0.0);
    }

    #[test]
    fn test_progress_percentage_basic() {
        assert_eq!(progress_percentage(50.0, Some(100.0)), 50.0);
        assert_eq!(progress_percentage(0.0, Some(100.0)), 0.0);
    }

    #[test]
    fn test_progress_percentage_caps_at_100() {
        assert_eq!(progress_percentage(250.0, Some(100.0)), 100.0);
    }

    #[test]
    fn test_progress_percentage_no_estimate() {
        // No estimate (or a zero estimate) must not divide by zero.
        assert_eq!(progress_percentage(40.0, None), 0.0);
        assert_eq!(progress_percentage(40.0, Some(0.0)), 0.0);
    }

    #[test]
    fn test_two_logs_one_developer_scenario() {
        // estimated 100h; 30h + 20h at rate 50 => 50h, 50%, 2500.
        let logs = vec![log(7, "dana", 30.0), log(7, "dana", 20.0)];
        let rates = vec![rate(7, Some(50.0))];

        let hours = total_logged_hours(&logs);
        assert_eq!(hours, 50.0);
        assert_eq!(progress_percentage(hours, Some(100.0)), 50.0);
        assert_eq!(total_development_cost(&logs, &rates), 2500.0);

        let breakdown = developer_costs(&logs, &rates);
        let dana = &breakdown["dana"];
        assert_eq!(dana.hours, 50.0);
        assert_eq!(dana.rate, 50.0);
        assert_eq!(dana.cost, 2500.0);
    }

    #[test]
    fn test_missing_assignment_costs_zero() {
        // User 2 has no assignment row at all: hours accumulate, cost stays 0.
        let logs = vec![log(1, "dana", 10.0), log(2, "eli", 8.0)];
        let rates = vec![rate(1, Some(60.0))];

        assert_eq!(total_development_cost(&logs, &rates), 600.0);

        let breakdown = developer_costs(&logs, &rates);
        assert_eq!(breakdown["eli"].hours, 8.0);
        assert_eq!(breakdown["eli"].rate, 0.0);
        assert_eq!(breakdown["eli"].cost, 0.0);
    }

    #[test]
    fn test_null_rate_costs_zero() {
        let logs = vec![log(3, "fen", 12.0)];
        let rates = vec![rate(3, None)];
        assert_eq!(total_development_cost(&logs, &rates), 0.0);
        assert_eq!(developer_costs(&logs, &rates)["fen"].cost, 0.0);
    }

    #[test]
    fn test_rate_change_moves_historical_cost() {
        // The current stored rate applies to all logs, including old ones.
        let logs = vec![log(1, "dana", 10.0)];
        let before = total_development_cost(&logs, &[rate(1, Some(40.0))]);
        let after = total_development_cost(&logs, &[rate(1, Some(80.0))]);
        assert_eq!(before, 400.0);
        assert_eq!(after, 800.0);
    }

    #[test]
    fn test_total_cost_components() {
        assert_eq!(total_cost(2500.0, 200.0, Some(1000.0), Some(300.0)), 4000.0);
        // Missing monetary fields default to zero before combining.
        assert_eq!(total_cost(2500.0, 0.0, None, None), 2500.0);
    }

    #[test]
    fn test_remaining_amount_rules() {
        assert_eq!(remaining_amount(Some(10000.0), Some(4000.0)), 6000.0);
        assert_eq!(remaining_amount(Some(10000.0), None), 10000.0);
        assert_eq!(remaining_amount(None, Some(4000.0)), 0.0);
        assert_eq!(remaining_amount(None, None), 0.0);
    }
}
