//! Custom field definition and per-project value models.

use devledger_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A manager-defined extra attribute attachable to any project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomField {
    pub id: DbId,
    pub name: String,
    /// `"text"`, `"number"`, `"date"`, `"select"`, or `"checkbox"`.
    pub field_type: String,
    /// JSON array of option strings; only meaningful for select fields.
    pub options_json: Option<String>,
    pub created_at: Timestamp,
}

/// A project's value for one custom field. At most one row per
/// (project, field): enforced by `uq_project_field_values_project_field`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectCustomFieldValue {
    pub id: DbId,
    pub project_id: DbId,
    pub field_id: DbId,
    /// Raw submitted text; interpreted by declared type only at render time.
    pub value: String,
    pub updated_at: Timestamp,
}

/// Value joined with its field definition for typed rendering.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomFieldValueView {
    pub field_id: DbId,
    pub name: String,
    pub field_type: String,
    pub options_json: Option<String>,
    pub value: String,
}

/// DTO for defining a new custom field.
#[derive(Debug, Deserialize)]
pub struct CreateCustomField {
    pub name: String,
    pub field_type: String,
    pub options_json: Option<String>,
}

/// DTO for editing a field definition. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateCustomField {
    pub name: Option<String>,
    pub options_json: Option<String>,
}
