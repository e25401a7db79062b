//! Repository for the `project_assignments` table.

use devledger_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::assignment::{AssignmentWithUser, ProjectAssignment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, user_id, hourly_rate, assigned_at";

/// Provides CRUD operations for project assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Assign a developer to a project inside a transaction.
    ///
    /// The rate starts unset; the manager fills it in afterwards. Violating
    /// `uq_project_assignments_project_user` surfaces as a 409 upstream.
    pub async fn create(
        conn: &mut PgConnection,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<ProjectAssignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_assignments (project_id, user_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectAssignment>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_one(conn)
            .await
    }

    /// Remove a developer from a project inside a transaction.
    ///
    /// Hard delete: the rate history is lost with the row.
    pub async fn delete_for_project_user(
        conn: &mut PgConnection,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_assignments WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find an assignment by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectAssignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_assignments WHERE id = $1");
        sqlx::query_as::<_, ProjectAssignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether the user is assigned to the project.
    pub async fn exists(pool: &PgPool, project_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM project_assignments WHERE project_id = $1 AND user_id = $2
             )",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// All assignments for a project, without usernames.
    ///
    /// This is the batched rate lookup the costing engine feeds on: one
    /// query per project, not one per work log.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectAssignment>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM project_assignments WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, ProjectAssignment>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Assignments joined with usernames, for the project detail view.
    pub async fn list_for_project_with_users(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<AssignmentWithUser>, sqlx::Error> {
        sqlx::query_as::<_, AssignmentWithUser>(
            "SELECT a.id, a.project_id, a.user_id, u.username, a.hourly_rate, a.assigned_at
             FROM project_assignments a
             JOIN users u ON u.id = a.user_id
             WHERE a.project_id = $1
             ORDER BY u.username",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// The currently assigned developer ids for a project.
    pub async fn user_ids_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT user_id FROM project_assignments WHERE project_id = $1 ORDER BY user_id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Set or clear the hourly rate. Returns `None` if the assignment is gone.
    pub async fn update_rate(
        pool: &PgPool,
        id: DbId,
        hourly_rate: Option<f64>,
    ) -> Result<Option<ProjectAssignment>, sqlx::Error> {
        let query = format!(
            "UPDATE project_assignments SET hourly_rate = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectAssignment>(&query)
            .bind(id)
            .bind(hourly_rate)
            .fetch_optional(pool)
            .await
    }
}
