//! Operating expense service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::models::ExpenseInput;
use shared::types::Id;

/// Expense service
#[derive(Clone)]
pub struct ExpenseService {
    db: PgPool,
}

/// Expense information
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Expense {
    pub id: Id,
    pub user_id: Id,
    pub expense_date: DateTime<Utc>,
    pub category: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const EXPENSE_COLUMNS: &str =
    "id, user_id, expense_date, category, amount, description, created_at, updated_at";

impl ExpenseService {
    /// Create a new ExpenseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All expenses, newest first
    pub async fn list(&self) -> AppResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {} FROM expenses ORDER BY expense_date DESC, id DESC",
            EXPENSE_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(expenses)
    }

    pub async fn get(&self, id: Id) -> AppResult<Expense> {
        sqlx::query_as::<_, Expense>(&format!(
            "SELECT {} FROM expenses WHERE id = $1",
            EXPENSE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))
    }

    /// Record an expense on behalf of the signed-in user
    pub async fn create(&self, user_id: Id, input: ExpenseInput) -> AppResult<Expense> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            INSERT INTO expenses (user_id, expense_date, category, amount, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            EXPENSE_COLUMNS
        ))
        .bind(user_id)
        .bind(input.expense_date)
        .bind(&input.category)
        .bind(input.amount)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(expense_id = expense.id, user_id, "Expense recorded");
        Ok(expense)
    }

    /// Replace an expense's fields; the recording user is kept
    pub async fn update(&self, id: Id, input: ExpenseInput) -> AppResult<Expense> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            UPDATE expenses
            SET expense_date = $2, category = $3, amount = $4, description = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EXPENSE_COLUMNS
        ))
        .bind(id)
        .bind(input.expense_date)
        .bind(&input.category)
        .bind(input.amount)
        .bind(&input.description)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;

        tracing::info!(expense_id = id, "Expense updated");
        Ok(expense)
    }

    pub async fn delete(&self, id: Id) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Expense".to_string()));
        }

        tracing::info!(expense_id = id, "Expense deleted");
        Ok(())
    }
}
