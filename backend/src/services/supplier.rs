//! Supplier directory service

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::models::SupplierInput;
use shared::types::Id;

/// Supplier service
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// Supplier information
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Supplier {
    pub id: Id,
    pub name: String,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All suppliers ordered by name
    pub async fn list(&self) -> AppResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, contact, created_at, updated_at FROM suppliers ORDER BY name ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(suppliers)
    }

    pub async fn get(&self, id: Id) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>(
            "SELECT id, name, contact, created_at, updated_at FROM suppliers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))
    }

    pub async fn create(&self, input: SupplierInput) -> AppResult<Supplier> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, contact)
            VALUES ($1, $2)
            RETURNING id, name, contact, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.contact)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(supplier_id = supplier.id, "Supplier created");
        Ok(supplier)
    }

    pub async fn update(&self, id: Id, input: SupplierInput) -> AppResult<Supplier> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
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
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        tracing::info!(supplier_id = id, "Supplier updated");
        Ok(supplier)
    }

    pub async fn delete(&self, id: Id) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                AppError::from(e).referenced_as(
                    "Cannot delete: this supplier already has purchases.",
                    "Gagal menghapus. Supplier ini sudah memiliki riwayat transaksi.",
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        tracing::info!(supplier_id = id, "Supplier deleted");
        Ok(())
    }
}
