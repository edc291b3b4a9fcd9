//! Product catalogue service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::models::ProductInput;
use shared::types::Id;

/// Product service for managing the catalogue and reading stock
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Product information
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: Id,
    pub name: String,
    pub stock: i32,
    pub selling_price: Decimal,
    pub last_purchase_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All products ordered by name
    pub async fn list(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, stock, selling_price, last_purchase_price, created_at, updated_at
            FROM products
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Number of products in the catalogue
    pub async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.db)
            .await?;

        Ok(count)
    }

    pub async fn get(&self, id: Id) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, stock, selling_price, last_purchase_price, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    pub async fn create(&self, input: ProductInput) -> AppResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, stock, selling_price, last_purchase_price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, stock, selling_price, last_purchase_price, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.stock)
        .bind(input.selling_price)
        .bind(input.last_purchase_price)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(product_id = product.id, "Product created");
        Ok(product)
    }

    /// Replace every editable field, stock included
    pub async fn update(&self, id: Id, input: ProductInput) -> AppResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $2, stock = $3, selling_price = $4, last_purchase_price = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, stock, selling_price, last_purchase_price, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.stock)
        .bind(input.selling_price)
        .bind(input.last_purchase_price)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        tracing::info!(product_id = id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: Id) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                AppError::from(e).referenced_as(
                    "Cannot delete: this product appears in purchase or sale history.",
                    "Gagal menghapus. Produk ini sudah memiliki riwayat transaksi.",
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }
}
