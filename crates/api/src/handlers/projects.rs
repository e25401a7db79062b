//! Handlers for the `/projects` resource.
//!
//! The update handler implements the snapshot-diff edit flow: read the row,
//! apply the full form, diff old against new field by field, and write one
//! operation log entry carrying the whole change list.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use devledger_core::audit::{modules, operations};
use devledger_core::change_tracking::{
    assignment_diff, diff_field, summarize, FieldChange, FieldValue,
};
use devledger_core::costing::{
    self, AssignedRate, DeveloperCost, LoggedWork,
};
use devledger_core::error::CoreError;
use devledger_core::status::{project_status_color, validate_project_status};
use devledger_core::types::DbId;
use devledger_core::custom_field;
use devledger_db::models::assignment::{AssignmentWithUser, UpdateRate};
use devledger_db::models::project::{
    CreateProject, Project, ProjectFields, UpdateProject, UpdateProjectStatus,
};
use devledger_db::models::expense_record::ProjectExpenseRecord;
use devledger_db::repositories::{
    AssignmentRepo, CustomFieldRepo, ExpenseRecordRepo, ExpenseRepo, ProjectRepo, WorkLogRepo,
};
use serde::Serialize;

use crate::audit;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Project detail read model: the row plus everything the cost view derives.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub status_color: &'static str,
    pub assignments: Vec<AssignmentWithUser>,
    pub total_logged_hours: f64,
    pub progress_percentage: f64,
    pub developer_costs: BTreeMap<String, DeveloperCost>,
    pub total_development_cost: f64,
    pub approved_expense_total: f64,
    /// Cost ledger rows written by expense approvals.
    pub expense_records: Vec<ProjectExpenseRecord>,
    pub total_cost: f64,
}

/// Response for the full-form edit: the new row and what changed.
#[derive(Debug, Serialize)]
pub struct ProjectUpdateResult {
    pub project: Project,
    pub changes: Vec<FieldChange>,
}

/// POST /api/v1/projects (manager only)
pub async fn create(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    if let Some(status) = input.fields.status.as_deref() {
        validate_project_status(status)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let remaining = costing::remaining_amount(
        input.fields.contract_amount_with_tax,
        input.fields.payment_received,
    );

    let mut tx = state.pool.begin().await?;

    let project = ProjectRepo::create(&mut tx, &input.fields, remaining).await?;

    for user_id in &input.assigned_developers {
        AssignmentRepo::create(&mut tx, project.id, *user_id).await?;
    }

    let log_entry = audit::entry(
        &manager,
        operations::CREATE,
        modules::PROJECT,
        format!("created project '{}'", project.name),
        Some("project"),
        Some(project.id),
    );
    devledger_db::repositories::OperationLogRepo::append_in_tx(&mut tx, &log_entry).await?;

    tx.commit().await?;

    tracing::info!(project_id = project.id, name = %project.name, "Project created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
///
/// Managers see every project; developers only the ones they are assigned to.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = if user.actor().is_manager() {
        ProjectRepo::list(&state.pool).await?
    } else {
        ProjectRepo::list_assigned(&state.pool, user.user_id).await?
    };
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id} (manager only)
///
/// The cost view: hours, progress, per-developer breakdown, development
/// cost, approved expense total, and grand total. Rates are the current
/// assignment rates, so a rate change moves historical costs too.
pub async fn get_detail(
    State(state): State<AppState>,
    RequireManager(_manager): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    let work_logs = WorkLogRepo::list_for_project(&state.pool, id).await?;
    let logs: Vec<LoggedWork> = work_logs
        .iter()
        .map(|w| LoggedWork {
            user_id: w.user_id,
            username: w.username.clone(),
            hours: w.hours,
        })
        .collect();

    // One batched rate lookup per project, not one query per work log.
    let assignments = AssignmentRepo::list_for_project(&state.pool, id).await?;
    let rates: Vec<AssignedRate> = assignments
        .iter()
        .map(|a| AssignedRate {
            user_id: a.user_id,
            hourly_rate: a.hourly_rate,
        })
        .collect();

    let total_logged_hours = costing::total_logged_hours(&logs);
    let progress = costing::progress_percentage(total_logged_hours, project.estimated_hours);
    let developer_costs = costing::developer_costs(&logs, &rates);
    let development_cost = costing::total_development_cost(&logs, &rates);
    let approved_expense_total = ExpenseRepo::approved_total_for_project(&state.pool, id).await?;
    let expense_records = ExpenseRecordRepo::list_for_project(&state.pool, id).await?;
    let total_cost = costing::total_cost(
        development_cost,
        approved_expense_total,
        project.outsourcing_cost,
        project.indirect_cost,
    );

    let assignments_with_users =
        AssignmentRepo::list_for_project_with_users(&state.pool, id).await?;
    let status_color = project_status_color(&project.status);

    Ok(Json(DataResponse {
        data: ProjectDetail {
            status_color,
            assignments: assignments_with_users,
            total_logged_hours,
            progress_percentage: progress,
            developer_costs,
            total_development_cost: development_cost,
            approved_expense_total,
            expense_records,
            total_cost,
            project,
        },
    }))
}

/// PUT /api/v1/projects/{id} (manager only)
///
/// Full-form edit in one transaction: apply fields, recompute
/// remaining_amount, sync assignments by set difference, upsert custom field
/// values, and write one audit entry listing every change (or "no changes").
pub async fn update(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<ProjectUpdateResult>>> {
    if let Some(status) = input.fields.status.as_deref() {
        validate_project_status(status)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let old = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    let new_remaining = costing::remaining_amount(
        input.fields.contract_amount_with_tax,
        input.fields.payment_received,
    );

    let mut changes = diff_project(&old, &input.fields);
    if let Some(change) = diff_field(
        "remaining_amount",
        &FieldValue::Money(Some(old.remaining_amount)),
        &FieldValue::Money(Some(new_remaining)),
    ) {
        changes.push(change);
    }

    let current_devs = AssignmentRepo::user_ids_for_project(&state.pool, id).await?;
    let (added, removed) = assignment_diff(&current_devs, &input.assigned_developers);

    // Field definitions for normalizing submitted custom values, and the
    // stored values so value changes land in the change list too.
    let field_defs = CustomFieldRepo::list_all(&state.pool).await?;
    let stored_values = CustomFieldRepo::values_for_project(&state.pool, id).await?;

    let mut tx = state.pool.begin().await?;

    let project = ProjectRepo::update_fields(&mut tx, id, &input.fields, new_remaining)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    for user_id in &added {
        AssignmentRepo::create(&mut tx, id, *user_id).await?;
    }
    for user_id in &removed {
        AssignmentRepo::delete_for_project_user(&mut tx, id, *user_id).await?;
    }
    if !added.is_empty() || !removed.is_empty() {
        changes.push(FieldChange {
            field: "assigned_developers".to_string(),
            old: format!("{current_devs:?}"),
            new: format!("{:?}", input.assigned_developers),
        });
    }

    for value_input in &input.custom_field_values {
        let def = field_defs
            .iter()
            .find(|f| f.id == value_input.field_id)
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "CustomField",
                id: value_input.field_id,
            }))?;
        let normalized = if def.field_type == custom_field::TYPE_CHECKBOX {
            custom_field::normalize_checkbox(value_input.value.as_deref()).to_string()
        } else {
            value_input.value.clone().unwrap_or_default()
        };

        // values_for_project lists every defined field, unset ones as "".
        let old_raw = stored_values
            .iter()
            .find(|v| v.field_id == value_input.field_id)
            .map(|v| v.value.as_str())
            .unwrap_or("");
        if let Some(change) =
            custom_field::diff_value(&def.name, &def.field_type, old_raw, &normalized)
        {
            changes.push(change);
        }

        CustomFieldRepo::upsert_value(&mut tx, id, value_input.field_id, &normalized).await?;
    }

    let log_entry = audit::entry(
        &manager,
        operations::EDIT,
        modules::PROJECT,
        format!("edited project '{}': {}", project.name, summarize(&changes)),
        Some("project"),
        Some(project.id),
    );
    devledger_db::repositories::OperationLogRepo::append_in_tx(&mut tx, &log_entry).await?;

    tx.commit().await?;

    tracing::info!(
        project_id = project.id,
        change_count = changes.len(),
        "Project updated"
    );

    Ok(Json(DataResponse {
        data: ProjectUpdateResult { project, changes },
    }))
}

/// PUT /api/v1/projects/{id}/status (manager only)
pub async fn update_status(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectStatus>,
) -> AppResult<Json<DataResponse<Project>>> {
    validate_project_status(&input.status)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let old = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    let project = ProjectRepo::update_status(&state.pool, id, &input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    audit::log_operation(
        &state.pool,
        &manager,
        operations::STATUS_CHANGE,
        modules::PROJECT,
        format!(
            "project '{}' status: {} -> {}",
            project.name, old.status, project.status
        ),
        Some("project"),
        Some(project.id),
    )
    .await;

    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{project_id}/assignments/{id}/rate (manager only)
///
/// `hourly_rate: null` clears the rate, which costs that developer's hours
/// at zero from then on.
pub async fn update_assignment_rate(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Path((project_id, assignment_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateRate>,
) -> AppResult<Json<DataResponse<devledger_db::models::assignment::ProjectAssignment>>> {
    let assignment = AssignmentRepo::find_by_id(&state.pool, assignment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectAssignment",
            id: assignment_id,
        }))?;

    if assignment.project_id != project_id {
        return Err(AppError::BadRequest(
            "Assignment does not belong to this project".into(),
        ));
    }

    if let Some(rate) = input.hourly_rate {
        if rate < 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "Hourly rate must not be negative".into(),
            )));
        }
    }

    let updated = AssignmentRepo::update_rate(&state.pool, assignment_id, input.hourly_rate)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectAssignment",
            id: assignment_id,
        }))?;

    audit::log_operation(
        &state.pool,
        &manager,
        operations::RATE_UPDATE,
        modules::PROJECT,
        format!(
            "assignment {} rate set to {}",
            assignment_id,
            updated
                .hourly_rate
                .map(|r| format!("{r:.2}"))
                .unwrap_or_else(|| "unset".to_string())
        ),
        Some("project"),
        Some(project_id),
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

/// Diff the stored project row against the submitted full form.
fn diff_project(old: &Project, new: &ProjectFields) -> Vec<FieldChange> {
    let new_status = new.status.clone().unwrap_or_else(|| old.status.clone());

    let pairs: Vec<(&str, FieldValue, FieldValue)> = vec![
        (
            "name",
            FieldValue::Text(Some(old.name.clone())),
            FieldValue::Text(Some(new.name.clone())),
        ),
        (
            "manager",
            FieldValue::Text(Some(old.manager.clone())),
            FieldValue::Text(Some(new.manager.clone())),
        ),
        (
            "customer_name",
            FieldValue::Text(old.customer_name.clone()),
            FieldValue::Text(new.customer_name.clone()),
        ),
        (
            "project_type",
            FieldValue::Text(old.project_type.clone()),
            FieldValue::Text(new.project_type.clone()),
        ),
        (
            "start_date",
            FieldValue::Date(old.start_date),
            FieldValue::Date(new.start_date),
        ),
        (
            "planned_end_date",
            FieldValue::Date(old.planned_end_date),
            FieldValue::Date(new.planned_end_date),
        ),
        (
            "acceptance_date",
            FieldValue::Date(old.acceptance_date),
            FieldValue::Date(new.acceptance_date),
        ),
        (
            "contract_signing_date",
            FieldValue::Date(old.contract_signing_date),
            FieldValue::Date(new.contract_signing_date),
        ),
        (
            "settlement_date",
            FieldValue::Date(old.settlement_date),
            FieldValue::Date(new.settlement_date),
        ),
        (
            "invoice_date",
            FieldValue::Date(old.invoice_date),
            FieldValue::Date(new.invoice_date),
        ),
        (
            "invoice_issued",
            FieldValue::Bool(old.invoice_issued),
            FieldValue::Bool(new.invoice_issued),
        ),
        (
            "payment_method",
            FieldValue::Text(old.payment_method.clone()),
            FieldValue::Text(new.payment_method.clone()),
        ),
        (
            "estimated_hours",
            FieldValue::Number(old.estimated_hours),
            FieldValue::Number(new.estimated_hours),
        ),
        (
            "contract_amount_with_tax",
            FieldValue::Money(old.contract_amount_with_tax),
            FieldValue::Money(new.contract_amount_with_tax),
        ),
        (
            "contract_amount_without_tax",
            FieldValue::Money(old.contract_amount_without_tax),
            FieldValue::Money(new.contract_amount_without_tax),
        ),
        (
            "payment_received",
            FieldValue::Money(old.payment_received),
            FieldValue::Money(new.payment_received),
        ),
        (
            "status",
            FieldValue::Text(Some(old.status.clone())),
            FieldValue::Text(Some(new_status)),
        ),
        (
            "outsourcing_cost",
            FieldValue::Money(old.outsourcing_cost),
            FieldValue::Money(new.outsourcing_cost),
        ),
        (
            "indirect_cost",
            FieldValue::Money(old.indirect_cost),
            FieldValue::Money(new.indirect_cost),
        ),
        (
            "indirect_cost_notes",
            FieldValue::Text(old.indirect_cost_notes.clone()),
            FieldValue::Text(new.indirect_cost_notes.clone()),
        ),
    ];

    pairs
        .iter()
        .filter_map(|(field, old_val, new_val)| diff_field(field, old_val, new_val))
        .collect()
}
