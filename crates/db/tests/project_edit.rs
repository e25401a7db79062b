//! Integration tests for project editing, custom field values, and the
//! operation log trail.

use devledger_db::models::custom_field::CreateCustomField;
use devledger_db::models::operation_log::{CreateOperationLog, OperationLogQuery};
use devledger_db::models::project::ProjectFields;
use devledger_db::models::user::CreateUser;
use devledger_db::repositories::{
    AssignmentRepo, CustomFieldRepo, OperationLogRepo, ProjectRepo, UserRepo,
};
use sqlx::PgPool;

fn fields(name: &str, contract: Option<f64>, received: Option<f64>) -> ProjectFields {
    ProjectFields {
        name: name.to_string(),
        manager: "boss".to_string(),
        customer_name: None,
        project_type: None,
        start_date: None,
        planned_end_date: None,
        acceptance_date: None,
        contract_signing_date: None,
        settlement_date: None,
        invoice_date: None,
        invoice_issued: false,
        payment_method: None,
        estimated_hours: None,
        contract_amount_with_tax: contract,
        contract_amount_without_tax: None,
        payment_received: received,
        status: None,
        outsourcing_cost: None,
        indirect_cost: None,
        indirect_cost_notes: None,
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_defaults_status_and_persists_remaining(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let project = ProjectRepo::create(&mut tx, &fields("Alpha", Some(10000.0), None), 10000.0)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(project.status, "initiating");
    assert!((project.remaining_amount - 10000.0).abs() < f64::EPSILON);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_fields_overwrites_remaining(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let project = ProjectRepo::create(&mut tx, &fields("Alpha", Some(10000.0), None), 10000.0)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let updated = ProjectRepo::update_fields(
        &mut tx,
        project.id,
        &fields("Alpha", Some(10000.0), Some(4000.0)),
        6000.0,
    )
    .await
    .unwrap()
    .expect("project should exist");
    tx.commit().await.unwrap();

    assert!((updated.remaining_amount - 6000.0).abs() < f64::EPSILON);
    assert_eq!(updated.payment_received, Some(4000.0));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_assignment_sync_and_rate(pool: PgPool) {
    let a = UserRepo::create(
        &pool,
        &CreateUser {
            username: "alice".into(),
            password_hash: "$argon2id$test".into(),
            role: "developer".into(),
        },
    )
    .await
    .unwrap();
    let b = UserRepo::create(
        &pool,
        &CreateUser {
            username: "bob".into(),
            password_hash: "$argon2id$test".into(),
            role: "developer".into(),
        },
    )
    .await
    .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let project = ProjectRepo::create(&mut tx, &fields("Alpha", None, None), 0.0)
        .await
        .unwrap();
    let assignment = AssignmentRepo::create(&mut tx, project.id, a.id).await.unwrap();
    AssignmentRepo::create(&mut tx, project.id, b.id).await.unwrap();
    tx.commit().await.unwrap();

    assert!(assignment.hourly_rate.is_none(), "rate starts unset");

    let updated = AssignmentRepo::update_rate(&pool, assignment.id, Some(50.0))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.hourly_rate, Some(50.0));

    // Remove bob; alice stays.
    let mut tx = pool.begin().await.unwrap();
    let removed = AssignmentRepo::delete_for_project_user(&mut tx, project.id, b.id)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    assert!(removed);

    let ids = AssignmentRepo::user_ids_for_project(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(ids, vec![a.id]);

    // Clearing the rate again is allowed.
    let cleared = AssignmentRepo::update_rate(&pool, assignment.id, None)
        .await
        .unwrap()
        .unwrap();
    assert!(cleared.hourly_rate.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_custom_field_value_upsert(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let project = ProjectRepo::create(&mut tx, &fields("Alpha", None, None), 0.0)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let field = CustomFieldRepo::create(
        &pool,
        &CreateCustomField {
            name: "Region".to_string(),
            field_type: "select".to_string(),
            options_json: Some(r#"["north","south"]"#.to_string()),
        },
    )
    .await
    .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let first = CustomFieldRepo::upsert_value(&mut tx, project.id, field.id, "north")
        .await
        .unwrap();
    // Same (project, field) again replaces the value instead of duplicating.
    let second = CustomFieldRepo::upsert_value(&mut tx, project.id, field.id, "south")
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.value, "south");

    let views = CustomFieldRepo::values_for_project(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].value, "south");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_value_only_edit_lands_in_change_list(pool: PgPool) {
    use devledger_core::change_tracking::{summarize, NO_CHANGES};
    use devledger_core::custom_field::diff_value;

    let mut tx = pool.begin().await.unwrap();
    let project = ProjectRepo::create(&mut tx, &fields("Alpha", None, None), 0.0)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let field = CustomFieldRepo::create(
        &pool,
        &CreateCustomField {
            name: "Region".to_string(),
            field_type: "select".to_string(),
            options_json: Some(r#"["north","south"]"#.to_string()),
        },
    )
    .await
    .unwrap();

    // An edit that touches only a custom field value: the stored value is
    // still unset ("") so the diff must produce a change, not the no-change
    // marker.
    let stored = CustomFieldRepo::values_for_project(&pool, project.id)
        .await
        .unwrap();
    let old_raw = stored
        .iter()
        .find(|v| v.field_id == field.id)
        .map(|v| v.value.as_str())
        .unwrap_or("");
    assert_eq!(old_raw, "");

    let mut changes = Vec::new();
    if let Some(change) = diff_value(&field.name, &field.field_type, old_raw, "north") {
        changes.push(change);
    }

    let mut tx = pool.begin().await.unwrap();
    CustomFieldRepo::upsert_value(&mut tx, project.id, field.id, "north")
        .await
        .unwrap();
    OperationLogRepo::append_in_tx(
        &mut tx,
        &CreateOperationLog {
            user_id: None,
            username: "boss".to_string(),
            operation: "edit".to_string(),
            module: "project".to_string(),
            detail: format!("edited project 'Alpha': {}", summarize(&changes)),
            target_type: Some("project".to_string()),
            target_id: Some(project.id),
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let trail = OperationLogRepo::query(&pool, &OperationLogQuery::default())
        .await
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert!(trail[0].detail.contains("Region: - -> north"));
    assert!(!trail[0].detail.contains(NO_CHANGES));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_operation_log_filtering_and_count(pool: PgPool) {
    let boss = UserRepo::create(
        &pool,
        &CreateUser {
            username: "boss".into(),
            password_hash: "$argon2id$test".into(),
            role: "manager".into(),
        },
    )
    .await
    .unwrap();

    for (operation, module) in [("create", "project"), ("edit", "project"), ("login", "auth")] {
        OperationLogRepo::append(
            &pool,
            &CreateOperationLog {
                user_id: Some(boss.id),
                username: "boss".to_string(),
                operation: operation.to_string(),
                module: module.to_string(),
                detail: format!("{operation} something"),
                target_type: None,
                target_id: None,
            },
        )
        .await
        .unwrap();
    }

    let project_only = OperationLogQuery {
        module: Some("project".to_string()),
        ..Default::default()
    };
    let items = OperationLogRepo::query(&pool, &project_only).await.unwrap();
    assert_eq!(items.len(), 2);
    let total = OperationLogRepo::count(&pool, &project_only).await.unwrap();
    assert_eq!(total, 2);

    let everything = OperationLogQuery::default();
    assert_eq!(OperationLogRepo::count(&pool, &everything).await.unwrap(), 3);

    // Pagination slices the newest-first ordering.
    let paged = OperationLogQuery {
        limit: Some(1),
        offset: Some(0),
        ..Default::default()
    };
    let first_page = OperationLogRepo::query(&pool, &paged).await.unwrap();
    assert_eq!(first_page.len(), 1);
    assert_eq!(first_page[0].operation, "login");
}
