//! Devledger domain core.
//!
//! Pure domain logic with no database or HTTP dependencies: shared types,
//! domain errors, role/policy checks, status vocabularies, the project
//! costing engine, edit change tracking, the expense approval state machine,
//! custom-field typing, and audit log vocabulary. Everything here operates on
//! plain data so it can be tested without a running server or database.

pub mod audit;
pub mod change_tracking;
pub mod costing;
pub mod custom_field;
pub mod error;
pub mod expense;
pub mod policy;
pub mod roles;
pub mod status;
pub mod types;
