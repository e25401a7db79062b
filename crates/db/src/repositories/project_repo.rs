//! Repository for the `projects` table.

use devledger_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::project::{Project, ProjectFields};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, manager, customer_name, project_type, \
    start_date, planned_end_date, acceptance_date, contract_signing_date, \
    settlement_date, invoice_date, invoice_issued, payment_method, \
    estimated_hours, contract_amount_with_tax, contract_amount_without_tax, \
    payment_received, remaining_amount, status, \
    outsourcing_cost, indirect_cost, indirect_cost_notes, \
    created_at, updated_at";

/// The mutable columns written by create and the full-form edit, bound in
/// this order by [`bind_fields`] (`$1..$20` for INSERT, `$2..$21` after the
/// id for UPDATE).
const FIELD_COLUMNS: &str = "\
    name, manager, customer_name, project_type, \
    start_date, planned_end_date, acceptance_date, contract_signing_date, \
    settlement_date, invoice_date, invoice_issued, payment_method, \
    estimated_hours, contract_amount_with_tax, contract_amount_without_tax, \
    payment_received, status, \
    outsourcing_cost, indirect_cost, indirect_cost_notes";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project inside a transaction, returning the created row.
    ///
    /// `remaining_amount` is the derived contract balance the caller has
    /// already computed; `status` defaults to `initiating` when unset.
    pub async fn create(
        conn: &mut PgConnection,
        fields: &ProjectFields,
        remaining_amount: f64,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects ({FIELD_COLUMNS}, remaining_amount)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                     COALESCE($17, 'initiating'), $18, $19, $20, $21)
             RETURNING {COLUMNS}"
        );
        bind_fields(sqlx::query_as::<_, Project>(&query), fields)
            .bind(remaining_amount)
            .fetch_one(conn)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// List the projects a developer is assigned to.
    pub async fn list_assigned(pool: &PgPool, user_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p
             WHERE EXISTS (
                 SELECT 1 FROM project_assignments a
                 WHERE a.project_id = p.id AND a.user_id = $1
             )
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Apply the full-form edit inside a transaction.
    ///
    /// Every mutable column is overwritten with the submitted value (the
    /// edit flow diffs against a snapshot beforehand, so unchanged fields
    /// simply write back the same value). Returns `None` if the project is
    /// gone.
    pub async fn update_fields(
        conn: &mut PgConnection,
        id: DbId,
        fields: &ProjectFields,
        remaining_amount: f64,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = $2, manager = $3, customer_name = $4, project_type = $5,
                start_date = $6, planned_end_date = $7, acceptance_date = $8,
                contract_signing_date = $9, settlement_date = $10, invoice_date = $11,
                invoice_issued = $12, payment_method = $13, estimated_hours = $14,
                contract_amount_with_tax = $15, contract_amount_without_tax = $16,
                payment_received = $17, status = COALESCE($18, status),
                outsourcing_cost = $19, indirect_cost = $20, indirect_cost_notes = $21,
                remaining_amount = $22, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        bind_fields(sqlx::query_as::<_, Project>(&query).bind(id), fields)
            .bind(remaining_amount)
            .fetch_optional(conn)
            .await
    }

    /// Quick status change. Returns `None` if the project does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}

/// Bind the shared field tuple in `FIELD_COLUMNS` order.
fn bind_fields<'q>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, Project, sqlx::postgres::PgArguments>,
    fields: &'q ProjectFields,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, Project, sqlx::postgres::PgArguments> {
    q.bind(&fields.name)
        .bind(&fields.manager)
        .bind(&fields.customer_name)
        .bind(&fields.project_type)
        .bind(fields.start_date)
        .bind(fields.planned_end_date)
        .bind(fields.acceptance_date)
        .bind(fields.contract_signing_date)
        .bind(fields.settlement_date)
        .bind(fields.invoice_date)
        .bind(fields.invoice_issued)
        .bind(&fields.payment_method)
        .bind(fields.estimated_hours)
        .bind(fields.contract_amount_with_tax)
        .bind(fields.contract_amount_without_tax)
        .bind(fields.payment_received)
        .bind(&fields.status)
        .bind(fields.outsourcing_cost)
        .bind(fields.indirect_cost)
        .bind(&fields.indirect_cost_notes)
}
