//! Customer directory service

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::models::CustomerInput;
use shared::types::Id;

/// Customer service
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

/// Customer information
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: Id,
    pub name: String,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All customers ordered by name
    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, contact, created_at, updated_at FROM customers ORDER BY name ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(customers)
    }

    pub async fn get(&self, id: Id) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            "SELECT id, name, contact, created_at, updated_at FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))
    }

    pub async fn create(&self, input: CustomerInput) -> AppResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, contact)
            VALUES ($1, $2)
            RETURNING id, name, contact, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.contact)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(customer_id = customer.id, "Customer created");
        Ok(customer)
    }

    pub async fn update(&self, id: Id, input: CustomerInput) -> AppResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = $2, contact = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, contact, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.contact)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        tracing::info!(customer_id = id, "Customer updated");
        Ok(customer)
    }

    pub async fn delete(&self, id: Id) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                AppError::from(e).referenced_as(
                    "Cannot delete: this customer already has sales.",
                    "Gagal menghapus. Pelanggan ini sudah memiliki riwayat transaksi.",
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        tracing::info!(customer_id = id, "Customer deleted");
        Ok(())
    }
}
