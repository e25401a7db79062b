//! Integration tests for the expense approval workflow.
//!
//! Exercises the repository layer against a real database: submission with
//! line items, the race-guarded decision, cost record generation, delegate
//! tasks, and the pending-only edit/delete rules.

use chrono::NaiveDate;
use devledger_db::models::expense::{CreateExpense, CreateExpenseItem, UpdateExpense};
use devledger_db::models::expense_record::CreateExpenseRecord;
use devledger_db::models::project::ProjectFields;
use devledger_db::models::task::CreateTask;
use devledger_db::models::user::CreateUser;
use devledger_db::repositories::{
    AssignmentRepo, ExpenseRecordRepo, ExpenseRepo, ProjectRepo, TaskRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(username: &str, role: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        password_hash: "$argon2id$test-placeholder".to_string(),
        role: role.to_string(),
    }
}

fn new_project_fields(name: &str) -> ProjectFields {
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
        estimated_hours: Some(100.0),
        contract_amount_with_tax: Some(50000.0),
        payment_received: None,
        contract_amount_without_tax: None,
        status: None,
        outsourcing_cost: None,
        indirect_cost: None,
        indirect_cost_notes: None,
    }
}

fn item(category: &str, name: &str, amount: f64) -> CreateExpenseItem {
    CreateExpenseItem {
        category: category.to_string(),
        item_name: name.to_string(),
        amount,
        expense_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        receipt_path: None,
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_submission_totals_items(pool: PgPool) {
    let dev = UserRepo::create(&pool, &new_user("dev", "developer"))
        .await
        .unwrap();

    let expense = ExpenseRepo::create(
        &pool,
        dev.id,
        &CreateExpense {
            project_id: None,
            title: "Conference trip".to_string(),
            expense_type: Some("travel".to_string()),
            items: vec![item("travel", "train", 120.0), item("meals", "dinner", 30.5)],
        },
    )
    .await
    .unwrap();

    assert_eq!(expense.status, "pending");
    assert!((expense.total_amount - 150.5).abs() < f64::EPSILON);

    let items = ExpenseRepo::items_for(&pool, expense.id).await.unwrap();
    assert_eq!(items.len(), 2);
}

// ---------------------------------------------------------------------------
// Decision guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_decide_only_once(pool: PgPool) {
    let dev = UserRepo::create(&pool, &new_user("dev", "developer"))
        .await
        .unwrap();
    let boss = UserRepo::create(&pool, &new_user("boss", "manager"))
        .await
        .unwrap();

    let expense = ExpenseRepo::create(
        &pool,
        dev.id,
        &CreateExpense {
            project_id: None,
            title: "Office chair".to_string(),
            expense_type: None,
            items: vec![item("office", "chair", 200.0)],
        },
    )
    .await
    .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let decided = ExpenseRepo::decide(&mut tx, expense.id, "approved", boss.id, Some("ok"))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let decided = decided.expect("first decision should land");
    assert_eq!(decided.status, "approved");
    assert_eq!(decided.approved_by, Some(boss.id));
    assert!(decided.approved_at.is_some());

    // A second decision sees no pending row.
    let mut tx = pool.begin().await.unwrap();
    let second = ExpenseRepo::decide(&mut tx, expense.id, "rejected", boss.id, None)
        .await
        .unwrap();
    tx.rollback().await.unwrap();
    assert!(second.is_none(), "decided expense must stay decided");

    let reloaded = ExpenseRepo::find_by_id(&pool, expense.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, "approved");
}

// ---------------------------------------------------------------------------
// Approval side effects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_approval_generates_one_record_per_item(pool: PgPool) {
    let dev = UserRepo::create(&pool, &new_user("dev", "developer"))
        .await
        .unwrap();
    let boss = UserRepo::create(&pool, &new_user("boss", "manager"))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let project = ProjectRepo::create(&mut tx, &new_project_fields("Plant sim"), 50000.0)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let expense = ExpenseRepo::create(
        &pool,
        dev.id,
        &CreateExpense {
            project_id: Some(project.id),
            title: "Site visit".to_string(),
            expense_type: Some("travel".to_string()),
            items: vec![item("travel", "flight", 450.0), item("accommodation", "hotel", 180.0)],
        },
    )
    .await
    .unwrap();

    // Mirror the approval transaction: decide, then one record per item.
    let mut tx = pool.begin().await.unwrap();
    let decided = ExpenseRepo::decide(&mut tx, expense.id, "approved", boss.id, None)
        .await
        .unwrap()
        .unwrap();
    let items = ExpenseRepo::items_for_in_tx(&mut tx, expense.id).await.unwrap();
    for it in &items {
        ExpenseRecordRepo::create(
            &mut tx,
            &CreateExpenseRecord {
                project_id: project.id,
                expense_id: decided.id,
                category: it.category.clone(),
                amount: it.amount,
                description: format!("{} - {}", decided.title, it.item_name),
                recorded_by: boss.id,
            },
        )
        .await
        .unwrap();
    }
    tx.commit().await.unwrap();

    let records = ExpenseRecordRepo::list_for_expense(&pool, expense.id)
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].category, "travel");
    assert!((records[0].amount - 450.0).abs() < f64::EPSILON);
    assert_eq!(records[1].category, "accommodation");

    let approved_total = ExpenseRepo::approved_total_for_project(&pool, project.id)
        .await
        .unwrap();
    assert!((approved_total - 630.0).abs() < 1e-9);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delegate_task_inside_decision_tx(pool: PgPool) {
    let dev = UserRepo::create(&pool, &new_user("dev", "developer"))
        .await
        .unwrap();
    let boss = UserRepo::create(&pool, &new_user("boss", "manager"))
        .await
        .unwrap();

    let expense = ExpenseRepo::create(
        &pool,
        dev.id,
        &CreateExpense {
            project_id: None,
            title: "Reimbursement".to_string(),
            expense_type: None,
            items: vec![item("other", "misc", 75.0)],
        },
    )
    .await
    .unwrap();

    let mut tx = pool.begin().await.unwrap();
    ExpenseRepo::decide(&mut tx, expense.id, "approved", boss.id, None)
        .await
        .unwrap()
        .unwrap();
    let task = TaskRepo::create_in_tx(
        &mut tx,
        boss.id,
        &CreateTask {
            title: "Process expense 'Reimbursement'".to_string(),
            description: None,
            task_type: Some("expense_process".to_string()),
            assigned_to: dev.id,
            expense_id: Some(expense.id),
            priority: None,
            due_date: None,
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(task.task_type.as_deref(), Some("expense_process"));
    assert_eq!(task.priority, "normal", "omitted priority defaults");
    assert_eq!(task.expense_id, Some(expense.id));

    let assigned = TaskRepo::list_for_assignee(&pool, dev.id).await.unwrap();
    assert_eq!(assigned.len(), 1);
}

// ---------------------------------------------------------------------------
// Pending-only mutation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_edit_and_delete_refuse_decided_expenses(pool: PgPool) {
    let dev = UserRepo::create(&pool, &new_user("dev", "developer"))
        .await
        .unwrap();
    let boss = UserRepo::create(&pool, &new_user("boss", "manager"))
        .await
        .unwrap();

    let expense = ExpenseRepo::create(
        &pool,
        dev.id,
        &CreateExpense {
            project_id: None,
            title: "Taxi".to_string(),
            expense_type: None,
            items: vec![item("transport", "taxi", 40.0), item("meals", "lunch", 15.0)],
        },
    )
    .await
    .unwrap();

    // Editing while pending updates the first item and recomputes the total.
    let updated = ExpenseRepo::update_pending(
        &pool,
        expense.id,
        &UpdateExpense {
            project_id: None,
            title: "Taxi to airport".to_string(),
            expense_type: None,
            first_item: item("transport", "taxi", 55.0),
        },
    )
    .await
    .unwrap()
    .expect("pending expense should be editable");
    assert_eq!(updated.title, "Taxi to airport");
    assert!((updated.total_amount - 70.0).abs() < f64::EPSILON);

    let mut tx = pool.begin().await.unwrap();
    ExpenseRepo::decide(&mut tx, expense.id, "rejected", boss.id, Some("no"))
        .await
        .unwrap()
        .unwrap();
    tx.commit().await.unwrap();

    // Decided: edit and delete both refuse.
    let refused = ExpenseRepo::update_pending(
        &pool,
        expense.id,
        &UpdateExpense {
            project_id: None,
            title: "Taxi again".to_string(),
            expense_type: None,
            first_item: item("transport", "taxi", 60.0),
        },
    )
    .await
    .unwrap();
    assert!(refused.is_none());

    let deleted = ExpenseRepo::delete_pending(&pool, expense.id).await.unwrap();
    assert!(!deleted);
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_assignment_hits_unique_constraint(pool: PgPool) {
    let dev = UserRepo::create(&pool, &new_user("dev", "developer"))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let project = ProjectRepo::create(&mut tx, &new_project_fields("Plant sim"), 50000.0)
        .await
        .unwrap();
    AssignmentRepo::create(&mut tx, project.id, dev.id).await.unwrap();
    tx.commit().await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let dup = AssignmentRepo::create(&mut tx, project.id, dev.id).await;
    match dup {
        Err(sqlx::Error::Database(db_err)) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(
                db_err.constraint(),
                Some("uq_project_assignments_project_user")
            );
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}
