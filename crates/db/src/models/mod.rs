//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Update/request DTOs where the resource supports mutation

pub mod assignment;
pub mod custom_field;
pub mod expense;
pub mod expense_record;
pub mod operation_log;
pub mod project;
pub mod task;
pub mod user;
pub mod work_log;
