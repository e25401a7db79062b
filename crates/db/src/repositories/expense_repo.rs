//! Repository for the `expenses` and `expense_items` tables.

use devledger_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::expense::{
    CreateExpense, CreateExpenseItem, Expense, ExpenseItem, UpdateExpense,
};

/// Column list for `expenses` SELECT queries.
const COLUMNS: &str = "\
    id, user_id, project_id, title, expense_type, total_amount, status, \
    submitted_at, approved_at, approved_by, approval_comment, created_at";

/// Column list for `expense_items` SELECT queries.
const ITEM_COLUMNS: &str =
    "id, expense_id, category, item_name, amount, expense_date, receipt_path";

/// Provides CRUD and workflow operations for expenses.
pub struct ExpenseRepo;

impl ExpenseRepo {
    /// Submit a new expense with its line items as one transaction.
    ///
    /// `total_amount` is the sum of the item amounts, computed here so the
    /// stored total can never drift from the items at submission time.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateExpense,
    ) -> Result<Expense, sqlx::Error> {
        let total: f64 = input.items.iter().map(|item| item.amount).sum();

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO expenses (user_id, project_id, title, expense_type, total_amount)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let expense = sqlx::query_as::<_, Expense>(&query)
            .bind(user_id)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.expense_type)
            .bind(total)
            .fetch_one(&mut *tx)
            .await?;

        for item in &input.items {
            Self::insert_item(&mut *tx, expense.id, item).await?;
        }

        tx.commit().await?;
        Ok(expense)
    }

    async fn insert_item(
        conn: &mut PgConnection,
        expense_id: DbId,
        item: &CreateExpenseItem,
    ) -> Result<ExpenseItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO expense_items (expense_id, category, item_name, amount, expense_date, receipt_path)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, ExpenseItem>(&query)
            .bind(expense_id)
            .bind(&item.category)
            .bind(&item.item_name)
            .bind(item.amount)
            .bind(item.expense_date)
            .bind(item.receipt_path.as_deref())
            .fetch_one(conn)
            .await
    }

    /// Find an expense by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM expenses WHERE id = $1");
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All expenses, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Expense>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM expenses ORDER BY submitted_at DESC");
        sqlx::query_as::<_, Expense>(&query).fetch_all(pool).await
    }

    /// One submitter's expenses, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Expense>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM expenses WHERE user_id = $1 ORDER BY submitted_at DESC");
        sqlx::query_as::<_, Expense>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The line items of an expense, in insertion order.
    pub async fn items_for(pool: &PgPool, expense_id: DbId) -> Result<Vec<ExpenseItem>, sqlx::Error> {
        let query =
            format!("SELECT {ITEM_COLUMNS} FROM expense_items WHERE expense_id = $1 ORDER BY id");
        sqlx::query_as::<_, ExpenseItem>(&query)
            .bind(expense_id)
            .fetch_all(pool)
            .await
    }

    /// Line items read inside the approval transaction.
    pub async fn items_for_in_tx(
        conn: &mut PgConnection,
        expense_id: DbId,
    ) -> Result<Vec<ExpenseItem>, sqlx::Error> {
        let query =
            format!("SELECT {ITEM_COLUMNS} FROM expense_items WHERE expense_id = $1 ORDER BY id");
        sqlx::query_as::<_, ExpenseItem>(&query)
            .bind(expense_id)
            .fetch_all(conn)
            .await
    }

    /// Edit a pending expense: header fields plus the first line item only.
    ///
    /// The caller has already checked ownership and the pending status; the
    /// `status = 'pending'` guard here closes the race against a concurrent
    /// decision. Returns `None` when the expense is gone or already decided.
    pub async fn update_pending(
        pool: &PgPool,
        id: DbId,
        input: &UpdateExpense,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Recompute the total: the first item changes, the rest keep their
        // stored amounts.
        let rest_total: f64 = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT SUM(amount) FROM expense_items
             WHERE expense_id = $1
               AND id <> (SELECT MIN(id) FROM expense_items WHERE expense_id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?
        .unwrap_or(0.0);

        let query = format!(
            "UPDATE expenses SET
                project_id = $2, title = $3, expense_type = $4, total_amount = $5
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        let expense = sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.expense_type)
            .bind(rest_total + input.first_item.amount)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(expense) = expense else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            "UPDATE expense_items SET
                category = $2, item_name = $3, amount = $4, expense_date = $5,
                receipt_path = COALESCE($6, receipt_path)
             WHERE id = (SELECT MIN(id) FROM expense_items WHERE expense_id = $1)",
        )
        .bind(id)
        .bind(&input.first_item.category)
        .bind(&input.first_item.item_name)
        .bind(input.first_item.amount)
        .bind(input.first_item.expense_date)
        .bind(input.first_item.receipt_path.as_deref())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(expense))
    }

    /// Delete a pending expense (items cascade). Returns `true` if a row
    /// was removed; decided expenses are left untouched.
    pub async fn delete_pending(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND status = 'pending'")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a decision inside the approval transaction.
    ///
    /// The `status = 'pending'` guard makes the transition atomic: a second
    /// concurrent decision sees zero rows and gets `None` back.
    pub async fn decide(
        conn: &mut PgConnection,
        id: DbId,
        new_status: &str,
        approved_by: DbId,
        comment: Option<&str>,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!(
            "UPDATE expenses SET
                status = $2, approved_by = $3, approval_comment = $4, approved_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(new_status)
            .bind(approved_by)
            .bind(comment)
            .fetch_optional(conn)
            .await
    }

    /// Sum of approved expense totals for a project, for the costing engine.
    pub async fn approved_total_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<f64, sqlx::Error> {
        sqlx::query_scalar::<_, Option<f64>>(
            "SELECT SUM(total_amount) FROM expenses
             WHERE project_id = $1 AND status = 'approved'",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
        .map(|sum| sum.unwrap_or(0.0))
    }
}
