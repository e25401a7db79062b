//! Repository for the `operation_logs` table.
//!
//! Entries are append-only. Workflow handlers append inside their own
//! transaction via [`OperationLogRepo::append_in_tx`] so the log entry and
//! the change it describes commit together.

use devledger_core::types::Timestamp;
use sqlx::{PgConnection, PgPool};

use crate::models::operation_log::{CreateOperationLog, OperationLog, OperationLogQuery};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, user_id, username, operation, module, detail, target_type, target_id, created_at";

/// Provides append and query operations for operation logs.
pub struct OperationLogRepo;

impl OperationLogRepo {
    /// Append one log entry.
    pub async fn append(
        pool: &PgPool,
        entry: &CreateOperationLog,
    ) -> Result<OperationLog, sqlx::Error> {
        sqlx::query_as::<_, OperationLog>(&insert_query())
            .bind(entry.user_id)
            .bind(&entry.username)
            .bind(&entry.operation)
            .bind(&entry.module)
            .bind(&entry.detail)
            .bind(&entry.target_type)
            .bind(entry.target_id)
            .fetch_one(pool)
            .await
    }

    /// Append one log entry inside a workflow transaction.
    pub async fn append_in_tx(
        conn: &mut PgConnection,
        entry: &CreateOperationLog,
    ) -> Result<OperationLog, sqlx::Error> {
        sqlx::query_as::<_, OperationLog>(&insert_query())
            .bind(entry.user_id)
            .bind(&entry.username)
            .bind(&entry.operation)
            .bind(&entry.module)
            .bind(&entry.detail)
            .bind(&entry.target_type)
            .bind(entry.target_id)
            .fetch_one(conn)
            .await
    }

    /// Query operation logs with filtering and pagination, newest first.
    pub async fn query(
        pool: &PgPool,
        params: &OperationLogQuery,
    ) -> Result<Vec<OperationLog>, sqlx::Error> {
        let limit = params.limit.unwrap_or(50).min(500);
        let offset = params.offset.unwrap_or(0);

        let (where_clause, bind_values, bind_idx) = build_log_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM operation_logs {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_log_values(sqlx::query_as::<_, OperationLog>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count operation logs matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &OperationLogQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_log_filter(params);

        let query = format!("SELECT COUNT(*)::BIGINT AS count FROM operation_logs {where_clause}");

        let q = bind_log_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }
}

/// Shared INSERT statement for the pool and transaction variants.
fn insert_query() -> String {
    format!(
        "INSERT INTO operation_logs
             (user_id, username, operation, module, detail, target_type, target_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {COLUMNS}"
    )
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built operation log queries.
enum BindValue {
    BigInt(i64),
    Text(String),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from `OperationLogQuery` filters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// empty if no filters are active, or starts with `WHERE `.
fn build_log_filter(params: &OperationLogQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(user_id) = params.user_id {
        conditions.push(format!("user_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(user_id));
    }

    if let Some(ref operation) = params.operation {
        conditions.push(format!("operation = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(operation.clone()));
    }

    if let Some(ref module) = params.module {
        conditions.push(format!("module = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(module.clone()));
    }

    if let Some(from) = params.from {
        conditions.push(format!("created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = params.to {
        conditions.push(format!("created_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_log_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_log_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
