//! Repository for the `work_logs` table.

use devledger_core::types::DbId;
use sqlx::PgPool;

use crate::models::work_log::{CreateWorkLog, WorkLog, WorkLogWithUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, project_id, date, hours, description, created_at";

/// Columns for the username-joined views.
const JOINED_COLUMNS: &str = "\
    w.id, w.user_id, w.project_id, u.username, w.date, w.hours, w.description, w.created_at";

/// Provides CRUD operations for work logs.
pub struct WorkLogRepo;

impl WorkLogRepo {
    /// Record hours for a user on a project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateWorkLog,
    ) -> Result<WorkLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO work_logs (user_id, project_id, date, hours, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkLog>(&query)
            .bind(user_id)
            .bind(input.project_id)
            .bind(input.date)
            .bind(input.hours)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// All work logs, newest first, with author usernames.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<WorkLogWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM work_logs w
             JOIN users u ON u.id = w.user_id
             ORDER BY w.date DESC, w.id DESC"
        );
        sqlx::query_as::<_, WorkLogWithUser>(&query)
            .fetch_all(pool)
            .await
    }

    /// One user's work logs, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<WorkLogWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM work_logs w
             JOIN users u ON u.id = w.user_id
             WHERE w.user_id = $1
             ORDER BY w.date DESC, w.id DESC"
        );
        sqlx::query_as::<_, WorkLogWithUser>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// All work logs for a project, the costing engine's input.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<WorkLogWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM work_logs w
             JOIN users u ON u.id = w.user_id
             WHERE w.project_id = $1
             ORDER BY w.date, w.id"
        );
        sqlx::query_as::<_, WorkLogWithUser>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
