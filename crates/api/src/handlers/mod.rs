//! HTTP request handlers, grouped by resource.

pub mod auth;
pub mod custom_fields;
pub mod expenses;
pub mod operation_logs;
pub mod projects;
pub mod tasks;
pub mod users;
pub mod work_logs;
