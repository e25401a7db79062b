use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    // Health check
    devledger_db::health_check(&pool).await.unwrap();

    // Verify all core tables exist and are queryable.
    let tables = [
        "users",
        "projects",
        "project_assignments",
        "work_logs",
        "expenses",
        "expense_items",
        "project_expense_records",
        "tasks",
        "custom_fields",
        "project_custom_field_values",
        "operation_logs",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Role values outside the CHECK constraint are rejected at the schema level.
#[sqlx::test(migrations = "../../migrations")]
async fn test_role_check_constraint(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO users (username, password_hash, role) VALUES ('eve', 'x', 'admin')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "unknown role should violate the CHECK");
}
