//! Repository for the `custom_fields` and `project_custom_field_values` tables.

use devledger_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::custom_field::{
    CreateCustomField, CustomField, CustomFieldValueView, ProjectCustomFieldValue,
    UpdateCustomField,
};

/// Column list for `custom_fields` SELECT queries.
const COLUMNS: &str = "id, name, field_type, options_json, created_at";

/// Column list for `project_custom_field_values` SELECT queries.
const VALUE_COLUMNS: &str = "id, project_id, field_id, value, updated_at";

/// Provides CRUD operations for custom field definitions and per-project
/// values.
pub struct CustomFieldRepo;

impl CustomFieldRepo {
    /// Create a field definition. Duplicate names violate
    /// `uq_custom_fields_name` and surface as a 409 upstream.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCustomField,
    ) -> Result<CustomField, sqlx::Error> {
        let query = format!(
            "INSERT INTO custom_fields (name, field_type, options_json)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomField>(&query)
            .bind(&input.name)
            .bind(&input.field_type)
            .bind(input.options_json.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Find a field definition by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CustomField>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM custom_fields WHERE id = $1");
        sqlx::query_as::<_, CustomField>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All field definitions, oldest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<CustomField>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM custom_fields ORDER BY id");
        sqlx::query_as::<_, CustomField>(&query).fetch_all(pool).await
    }

    /// Rename a field or replace its options. The type is immutable once
    /// created; stored values are never rewritten.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCustomField,
    ) -> Result<Option<CustomField>, sqlx::Error> {
        let query = format!(
            "UPDATE custom_fields SET
                name = COALESCE($2, name),
                options_json = COALESCE($3, options_json)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomField>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.options_json.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Delete a field definition; stored project values cascade with it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM custom_fields WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set one project's value for a field inside the project-edit
    /// transaction. Upserts on `uq_project_field_values_project_field`.
    /// The caller has already normalized the value for the field type
    /// (checkbox absent-key convention and so on).
    pub async fn upsert_value(
        conn: &mut PgConnection,
        project_id: DbId,
        field_id: DbId,
        value: &str,
    ) -> Result<ProjectCustomFieldValue, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_custom_field_values (project_id, field_id, value)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_project_field_values_project_field
             DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
             RETURNING {VALUE_COLUMNS}"
        );
        sqlx::query_as::<_, ProjectCustomFieldValue>(&query)
            .bind(project_id)
            .bind(field_id)
            .bind(value)
            .fetch_one(conn)
            .await
    }

    /// Every field definition with the project's stored value (NULL when the
    /// project never set one), for the project detail view.
    pub async fn values_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<CustomFieldValueView>, sqlx::Error> {
        sqlx::query_as::<_, CustomFieldValueView>(
            "SELECT f.id AS field_id, f.name, f.field_type, f.options_json,
                    COALESCE(v.value, '') AS value
             FROM custom_fields f
             LEFT JOIN project_custom_field_values v
               ON v.field_id = f.id AND v.project_id = $1
             ORDER BY f.id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
