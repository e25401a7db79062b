//! Repository for the `project_expense_records` table.
//!
//! Records are only ever written inside the approval transaction; there is
//! no update or delete path.

use devledger_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::expense_record::{CreateExpenseRecord, ProjectExpenseRecord};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, project_id, expense_id, category, amount, description, recorded_by, recorded_at";

/// Provides insert and query operations for project expense records.
pub struct ExpenseRecordRepo;

impl ExpenseRecordRepo {
    /// Insert one ledger record inside the approval transaction.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateExpenseRecord,
    ) -> Result<ProjectExpenseRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_expense_records
                 (project_id, expense_id, category, amount, description, recorded_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectExpenseRecord>(&query)
            .bind(input.project_id)
            .bind(input.expense_id)
            .bind(&input.category)
            .bind(input.amount)
            .bind(&input.description)
            .bind(input.recorded_by)
            .fetch_one(conn)
            .await
    }

    /// All ledger records for a project, newest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectExpenseRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_expense_records
             WHERE project_id = $1
             ORDER BY recorded_at DESC, id DESC"
        );
        sqlx::query_as::<_, ProjectExpenseRecord>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// The records generated by one expense's approval.
    pub async fn list_for_expense(
        pool: &PgPool,
        expense_id: DbId,
    ) -> Result<Vec<ProjectExpenseRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_expense_records WHERE expense_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, ProjectExpenseRecord>(&query)
            .bind(expense_id)
            .fetch_all(pool)
            .await
    }
}
