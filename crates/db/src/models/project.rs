//! Project entity model and DTOs.

use devledger_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
///
/// `remaining_amount` is persisted but derived: it is recomputed from
/// `contract_amount_with_tax` and `payment_received` on every create/update.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub manager: String,
    pub customer_name: Option<String>,
    pub project_type: Option<String>,
    pub start_date: Option<Date>,
    pub planned_end_date: Option<Date>,
    pub acceptance_date: Option<Date>,
    pub contract_signing_date: Option<Date>,
    pub settlement_date: Option<Date>,
    pub invoice_date: Option<Date>,
    pub invoice_issued: bool,
    pub payment_method: Option<String>,
    pub estimated_hours: Option<f64>,
    pub contract_amount_with_tax: Option<f64>,
    pub contract_amount_without_tax: Option<f64>,
    pub payment_received: Option<f64>,
    pub remaining_amount: f64,
    pub status: String,
    pub outsourcing_cost: Option<f64>,
    pub indirect_cost: Option<f64>,
    pub indirect_cost_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The mutable project fields, shared between the create and edit payloads.
///
/// This is a full-form DTO: every field carries the complete new value (with
/// `None` meaning "unset"), matching the snapshot-diff edit flow rather than
/// a partial patch.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectFields {
    pub name: String,
    pub manager: String,
    pub customer_name: Option<String>,
    pub project_type: Option<String>,
    pub start_date: Option<Date>,
    pub planned_end_date: Option<Date>,
    pub acceptance_date: Option<Date>,
    pub contract_signing_date: Option<Date>,
    pub settlement_date: Option<Date>,
    pub invoice_date: Option<Date>,
    #[serde(default)]
    pub invoice_issued: bool,
    pub payment_method: Option<String>,
    pub estimated_hours: Option<f64>,
    pub contract_amount_with_tax: Option<f64>,
    pub contract_amount_without_tax: Option<f64>,
    pub payment_received: Option<f64>,
    pub status: Option<String>,
    pub outsourcing_cost: Option<f64>,
    pub indirect_cost: Option<f64>,
    pub indirect_cost_notes: Option<String>,
}

/// DTO for creating a project, including the initial developer selection.
#[derive(Debug, Deserialize)]
pub struct CreateProject {
    #[serde(flatten)]
    pub fields: ProjectFields,
    /// User ids of the developers to assign.
    #[serde(default)]
    pub assigned_developers: Vec<DbId>,
}

/// DTO for the full-form project edit.
#[derive(Debug, Deserialize)]
pub struct UpdateProject {
    #[serde(flatten)]
    pub fields: ProjectFields,
    /// The complete new developer selection (set-difference applied).
    #[serde(default)]
    pub assigned_developers: Vec<DbId>,
    /// Custom field values keyed by field id; omitted fields are untouched.
    #[serde(default)]
    pub custom_field_values: Vec<CustomFieldValueInput>,
}

/// One submitted custom field value.
///
/// `value: None` follows the checkbox absent-key convention (unchecked).
#[derive(Debug, Clone, Deserialize)]
pub struct CustomFieldValueInput {
    pub field_id: DbId,
    pub value: Option<String>,
}

/// Quick status update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectStatus {
    pub status: String,
}
