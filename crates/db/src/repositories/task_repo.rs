//! Repository for the `tasks` table.

use devledger_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::task::{CreateTask, Task};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, title, description, task_type, assigned_to, assigned_by, expense_id, \
    status, priority, due_date, completed_at, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    ///
    /// Priority defaults to `normal` when the DTO leaves it unset.
    pub async fn create(
        pool: &PgPool,
        assigned_by: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        sqlx::query_as::<_, Task>(&insert_query())
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.task_type)
            .bind(input.assigned_to)
            .bind(assigned_by)
            .bind(input.expense_id)
            .bind(&input.priority)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Insert a task inside a transaction -- used by the approval workflow
    /// when a delegate is designated, so the follow-up task commits (or rolls
    /// back) together with the decision.
    pub async fn create_in_tx(
        conn: &mut PgConnection,
        assigned_by: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        sqlx::query_as::<_, Task>(&insert_query())
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.task_type)
            .bind(input.assigned_to)
            .bind(assigned_by)
            .bind(input.expense_id)
            .bind(&input.priority)
            .bind(input.due_date)
            .fetch_one(conn)
            .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All tasks, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks ORDER BY created_at DESC");
        sqlx::query_as::<_, Task>(&query).fetch_all(pool).await
    }

    /// Tasks assigned to one user, newest first.
    pub async fn list_for_assignee(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tasks WHERE assigned_to = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Change a task's status. `done` stamps `completed_at`; leaving `done`
    /// clears it again. Returns `None` if the task does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                status = $2,
                completed_at = CASE WHEN $2 = 'done' THEN NOW() ELSE NULL END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}

/// Shared INSERT statement for the pool and transaction variants.
fn insert_query() -> String {
    format!(
        "INSERT INTO tasks
             (title, description, task_type, assigned_to, assigned_by, expense_id, priority, due_date)
         VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'normal'), $8)
         RETURNING {COLUMNS}"
    )
}
