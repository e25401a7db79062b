//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Methods that must share a
//! transaction with other writes (the approval workflow, the project edit
//! flow) accept `&mut PgConnection` instead.

pub mod assignment_repo;
pub mod custom_field_repo;
pub mod expense_record_repo;
pub mod expense_repo;
pub mod operation_log_repo;
pub mod project_repo;
pub mod task_repo;
pub mod user_repo;
pub mod work_log_repo;

pub use assignment_repo::AssignmentRepo;
pub use custom_field_repo::CustomFieldRepo;
pub use expense_record_repo::ExpenseRecordRepo;
pub use expense_repo::ExpenseRepo;
pub use operation_log_repo::OperationLogRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
pub use work_log_repo::WorkLogRepo;
