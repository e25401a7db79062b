//! Handlers for custom field definitions and per-project values.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use devledger_core::audit::{modules, operations};
use devledger_core::custom_field::{display_value, validate_field_type};
use devledger_core::error::CoreError;
use devledger_core::types::DbId;
use devledger_db::models::custom_field::{CreateCustomField, CustomField, UpdateCustomField};
use devledger_db::repositories::{CustomFieldRepo, ProjectRepo};
use serde::Serialize;

use crate::audit::log_operation;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// One field value rendered for display alongside its raw form.
#[derive(Debug, Serialize)]
pub struct RenderedFieldValue {
    pub field_id: DbId,
    pub name: String,
    pub field_type: String,
    pub value: String,
    /// Typed rendering: checkbox values become yes/no, everything else is raw.
    pub display: String,
}

/// POST /api/v1/custom-fields (manager only)
pub async fn create(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Json(input): Json<CreateCustomField>,
) -> AppResult<(StatusCode, Json<DataResponse<CustomField>>)> {
    validate_field_type(&input.field_type)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // uq_custom_fields_name turns duplicate names into a 409.
    let field = CustomFieldRepo::create(&state.pool, &input).await?;

    log_operation(
        &state.pool,
        &manager,
        operations::CREATE,
        modules::CUSTOM_FIELD,
        format!("created custom field '{}' ({})", field.name, field.field_type),
        Some("custom_field"),
        Some(field.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: field })))
}

/// GET /api/v1/custom-fields (manager only)
pub async fn list(
    State(state): State<AppState>,
    RequireManager(_manager): RequireManager,
) -> AppResult<Json<DataResponse<Vec<CustomField>>>> {
    let fields = CustomFieldRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: fields }))
}

/// PUT /api/v1/custom-fields/{id} (manager only)
pub async fn update(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCustomField>,
) -> AppResult<Json<DataResponse<CustomField>>> {
    let field = CustomFieldRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CustomField",
            id,
        }))?;

    log_operation(
        &state.pool,
        &manager,
        operations::EDIT,
        modules::CUSTOM_FIELD,
        format!("edited custom field '{}'", field.name),
        Some("custom_field"),
        Some(field.id),
    )
    .await;

    Ok(Json(DataResponse { data: field }))
}

/// DELETE /api/v1/custom-fields/{id} (manager only)
///
/// Stored project values cascade away with the definition.
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let field = CustomFieldRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CustomField",
            id,
        }))?;

    CustomFieldRepo::delete(&state.pool, id).await?;

    log_operation(
        &state.pool,
        &manager,
        operations::DELETE,
        modules::CUSTOM_FIELD,
        format!("deleted custom field '{}'", field.name),
        Some("custom_field"),
        Some(id),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/custom-fields (manager only)
///
/// Every defined field with the project's value, rendered per its type.
pub async fn values_for_project(
    State(state): State<AppState>,
    RequireManager(_manager): RequireManager,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<RenderedFieldValue>>>> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let values = CustomFieldRepo::values_for_project(&state.pool, project_id).await?;
    let rendered = values
        .into_iter()
        .map(|v| RenderedFieldValue {
            display: display_value(&v.field_type, &v.value),
            field_id: v.field_id,
            name: v.name,
            field_type: v.field_type,
            value: v.value,
        })
        .collect();

    Ok(Json(DataResponse { data: rendered }))
}
