//! Handlers for the `/expenses` resource, including the approval workflow.
//!
//! Approval is the one operation with cascading side effects (cost records,
//! delegate task, audit entry); everything runs in a single transaction so a
//! failure in any step leaves the expense pending.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use devledger_core::audit::{
    delegate_task_description, expense_decision_detail, modules, operations,
};
use devledger_core::error::CoreError;
use devledger_core::expense::{record_description, validate_category, STATUS_APPROVED, STATUS_REJECTED};
use devledger_core::policy::{can, Action};
use devledger_core::status::TASK_TYPE_EXPENSE_PROCESS;
use devledger_core::types::DbId;
use devledger_db::models::expense::{
    ApproveExpense, CreateExpense, CreateExpenseItem, Expense, ExpenseWithItems, RejectExpense,
    UpdateExpense,
};
use devledger_db::models::expense_record::CreateExpenseRecord;
use devledger_db::models::task::CreateTask;
use devledger_db::repositories::{
    ExpenseRecordRepo, ExpenseRepo, OperationLogRepo, TaskRepo, UserRepo,
};

use crate::audit;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Validate the submitted line items: at least one, known categories,
/// non-negative amounts.
fn validate_items(items: &[CreateExpenseItem]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "An expense needs at least one item".into(),
        )));
    }
    for item in items {
        validate_category(&item.category)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
        if item.amount < 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "Item amount must not be negative".into(),
            )));
        }
    }
    Ok(())
}

/// POST /api/v1/expenses
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateExpense>,
) -> AppResult<(StatusCode, Json<DataResponse<Expense>>)> {
    validate_items(&input.items)?;

    let expense = ExpenseRepo::create(&state.pool, user.user_id, &input).await?;

    tracing::info!(
        expense_id = expense.id,
        user_id = user.user_id,
        total = expense.total_amount,
        "Expense submitted"
    );

    audit::log_operation(
        &state.pool,
        &user,
        operations::CREATE,
        modules::EXPENSE,
        format!(
            "submitted expense '{}' ({:.2})",
            expense.title, expense.total_amount
        ),
        Some("expense"),
        Some(expense.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: expense })))
}

/// GET /api/v1/expenses
///
/// Managers see all expenses; developers only their own.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Expense>>>> {
    let expenses = if user.actor().is_manager() {
        ExpenseRepo::list_all(&state.pool).await?
    } else {
        ExpenseRepo::list_for_user(&state.pool, user.user_id).await?
    };
    Ok(Json(DataResponse { data: expenses }))
}

/// GET /api/v1/expenses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ExpenseWithItems>>> {
    let expense = find_expense(&state, id).await?;

    if !can(
        &user.actor(),
        &Action::ViewExpense {
            submitter_id: expense.user_id,
        },
    ) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only view your own expenses".into(),
        )));
    }

    let items = ExpenseRepo::items_for(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: ExpenseWithItems { expense, items },
    }))
}

/// PUT /api/v1/expenses/{id}
///
/// Only the submitter may edit, and only while the expense is pending.
/// Edits touch the header and the first line item.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateExpense>,
) -> AppResult<Json<DataResponse<Expense>>> {
    let expense = find_expense(&state, id).await?;

    if !can(
        &user.actor(),
        &Action::EditExpense {
            submitter_id: expense.user_id,
            status: expense.status.clone(),
        },
    ) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the submitter may edit a pending expense".into(),
        )));
    }

    validate_items(std::slice::from_ref(&input.first_item))?;

    let updated = ExpenseRepo::update_pending(&state.pool, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Expense has already been decided".into(),
            ))
        })?;

    audit::log_operation(
        &state.pool,
        &user,
        operations::EDIT,
        modules::EXPENSE,
        format!("edited expense '{}'", updated.title),
        Some("expense"),
        Some(updated.id),
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/expenses/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let expense = find_expense(&state, id).await?;

    if !can(
        &user.actor(),
        &Action::DeleteExpense {
            submitter_id: expense.user_id,
            status: expense.status.clone(),
        },
    ) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the submitter may delete a pending expense".into(),
        )));
    }

    let deleted = ExpenseRepo::delete_pending(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::Conflict(
            "Expense has already been decided".into(),
        )));
    }

    audit::log_operation(
        &state.pool,
        &user,
        operations::DELETE,
        modules::EXPENSE,
        format!("deleted expense '{}'", expense.title),
        Some("expense"),
        Some(id),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/expenses/{id}/approve (manager only)
///
/// One transaction covers the decision, the per-item cost records (when the
/// expense is tied to a project), the optional delegate task, and the audit
/// entry. A concurrent decision makes the guarded UPDATE hit zero rows,
/// which surfaces as a 409.
pub async fn approve(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<ApproveExpense>,
) -> AppResult<Json<DataResponse<Expense>>> {
    find_expense(&state, id).await?;

    // Validate the delegate up front so the transaction cannot fail on a
    // foreign key.
    if let Some(delegate_id) = input.delegate_user_id {
        UserRepo::find_by_id(&state.pool, delegate_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: delegate_id,
            }))?;
    }

    let mut tx = state.pool.begin().await?;

    let expense = ExpenseRepo::decide(
        &mut tx,
        id,
        STATUS_APPROVED,
        manager.user_id,
        input.comment.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Expense has already been decided".into(),
        ))
    })?;

    // Project-linked expenses feed the cost ledger: one record per item.
    if let Some(project_id) = expense.project_id {
        let items = ExpenseRepo::items_for_in_tx(&mut tx, id).await?;
        for item in &items {
            ExpenseRecordRepo::create(
                &mut tx,
                &CreateExpenseRecord {
                    project_id,
                    expense_id: expense.id,
                    category: item.category.clone(),
                    amount: item.amount,
                    description: record_description(&expense.title, &item.item_name),
                    recorded_by: manager.user_id,
                },
            )
            .await?;
        }
    }

    if let Some(delegate_id) = input.delegate_user_id {
        TaskRepo::create_in_tx(
            &mut tx,
            manager.user_id,
            &CreateTask {
                title: format!("Process expense '{}'", expense.title),
                description: Some(delegate_task_description(
                    &expense.title,
                    expense.total_amount,
                    input.comment.as_deref(),
                )),
                task_type: Some(TASK_TYPE_EXPENSE_PROCESS.to_string()),
                assigned_to: delegate_id,
                expense_id: Some(expense.id),
                priority: None,
                due_date: None,
            },
        )
        .await?;
    }

    let log_entry = audit::entry(
        &manager,
        operations::APPROVE,
        modules::EXPENSE,
        expense_decision_detail(operations::APPROVE, &expense.title, expense.total_amount),
        Some("expense"),
        Some(expense.id),
    );
    OperationLogRepo::append_in_tx(&mut tx, &log_entry).await?;

    tx.commit().await?;

    tracing::info!(
        expense_id = expense.id,
        approved_by = manager.user_id,
        delegate = ?input.delegate_user_id,
        "Expense approved"
    );

    Ok(Json(DataResponse { data: expense }))
}

/// POST /api/v1/expenses/{id}/reject (manager only)
///
/// Records the decision and comment; no cost records, no tasks.
pub async fn reject(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<RejectExpense>,
) -> AppResult<Json<DataResponse<Expense>>> {
    find_expense(&state, id).await?;

    let mut tx = state.pool.begin().await?;

    let expense = ExpenseRepo::decide(
        &mut tx,
        id,
        STATUS_REJECTED,
        manager.user_id,
        input.comment.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Expense has already been decided".into(),
        ))
    })?;

    let log_entry = audit::entry(
        &manager,
        operations::REJECT,
        modules::EXPENSE,
        expense_decision_detail(operations::REJECT, &expense.title, expense.total_amount),
        Some("expense"),
        Some(expense.id),
    );
    OperationLogRepo::append_in_tx(&mut tx, &log_entry).await?;

    tx.commit().await?;

    tracing::info!(
        expense_id = expense.id,
        rejected_by = manager.user_id,
        "Expense rejected"
    );

    Ok(Json(DataResponse { data: expense }))
}

async fn find_expense(state: &AppState, id: DbId) -> Result<Expense, AppError> {
    ExpenseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Expense",
            id,
        }))
}
