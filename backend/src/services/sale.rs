//! Sale ledger service
//!
//! A sale is recorded once and never edited. Recording it writes the header
//! and lines and takes the sold quantities out of stock in one transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::ledger::{apply_movements, MissingProduct};
use shared::ledger::{sale_movements, SaleTotals};
use shared::models::{NewSale, SaleItem, SaleRequest};
use shared::types::{FieldErrors, Id, PaymentStatus};
use shared::validation::{is_money, push_error};

/// Sale service
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
    missing_product: MissingProduct,
}

/// Sale header
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Sale {
    pub id: Id,
    pub user_id: Id,
    pub customer_id: Option<Id>,
    pub customer_name: Option<String>,
    pub sale_date: DateTime<Utc>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub final_total: Decimal,
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sale line
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SaleDetail {
    pub id: Id,
    pub sale_id: Id,
    pub product_id: Id,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Sale with its lines
#[derive(Debug, Clone, Serialize)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleDetail>,
}

const SALE_SELECT: &str = r#"
    SELECT s.id, s.user_id, s.customer_id, c.name AS customer_name, s.sale_date,
           s.subtotal, s.discount, s.final_total, s.payment_status, s.note,
           s.created_at, s.updated_at
    FROM sales s
    LEFT JOIN customers c ON c.id = s.customer_id
"#;

const DETAIL_SELECT: &str = r#"
    SELECT d.id, d.sale_id, d.product_id, pr.name AS product_name, d.quantity, d.unit_price
    FROM sale_details d
    JOIN products pr ON pr.id = d.product_id
"#;

/// Reject a sale whose lines or totals do not add up
pub fn check_sale(sale: &NewSale) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    if sale.items.is_empty() {
        push_error(&mut errors, "items", "Minimal satu barang harus diisi.");
    }
    if sale.items.iter().any(|item| item.quantity < 1) {
        push_error(&mut errors, "jumlah", "Jumlah tidak valid");
    }
    if sale.discount < Decimal::ZERO {
        push_error(&mut errors, "discount", "Discount tidak boleh negatif");
    }
    if [sale.subtotal, sale.discount, sale.final_total].iter().any(|v| !is_money(*v)) {
        push_error(&mut errors, "total_akhir", "Total penjualan harus dalam satuan sen dan tidak melebihi batas");
    }
    if sale.final_total != sale.subtotal - sale.discount {
        push_error(&mut errors, "total_akhir", "Total akhir harus sama dengan subtotal dikurangi discount");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::invalid_form(errors))
    }
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool, strict_stock: bool) -> Self {
        Self {
            db,
            missing_product: if strict_stock {
                MissingProduct::Fail
            } else {
                MissingProduct::Warn
            },
        }
    }

    /// All sales with lines, newest first
    pub async fn list(&self) -> AppResult<Vec<SaleWithItems>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "{} ORDER BY s.sale_date DESC, s.id DESC",
            SALE_SELECT
        ))
        .fetch_all(&self.db)
        .await?;

        let ids: Vec<Id> = sales.iter().map(|s| s.id).collect();
        let details = sqlx::query_as::<_, SaleDetail>(&format!(
            "{} WHERE d.sale_id = ANY($1) ORDER BY d.id",
            DETAIL_SELECT
        ))
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        let mut by_sale: HashMap<Id, Vec<SaleDetail>> = HashMap::new();
        for detail in details {
            by_sale.entry(detail.sale_id).or_default().push(detail);
        }

        Ok(sales
            .into_iter()
            .map(|sale| {
                let items = by_sale.remove(&sale.id).unwrap_or_default();
                SaleWithItems { sale, items }
            })
            .collect())
    }

    pub async fn get(&self, id: Id) -> AppResult<SaleWithItems> {
        let sale = sqlx::query_as::<_, Sale>(&format!("{} WHERE s.id = $1", SALE_SELECT))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let items = sqlx::query_as::<_, SaleDetail>(&format!(
            "{} WHERE d.sale_id = $1 ORDER BY d.id",
            DETAIL_SELECT
        ))
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        Ok(SaleWithItems { sale, items })
    }

    /// Price a cashier's request at the product's current selling price
    pub async fn quote(&self, request: SaleRequest) -> AppResult<NewSale> {
        let unit_price = sqlx::query_scalar::<_, Decimal>(
            "SELECT selling_price FROM products WHERE id = $1",
        )
        .bind(request.product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| {
            let mut errors = FieldErrors::new();
            push_error(&mut errors, "productId", "Produk tidak ditemukan");
            AppError::invalid_form(errors)
        })?;

        let totals = SaleTotals::from_percent(unit_price, request.quantity, request.discount_percent)
            .filter(|totals| is_money(totals.subtotal))
            .ok_or_else(|| {
                let mut errors = FieldErrors::new();
                push_error(&mut errors, "jumlah", "Total penjualan terlalu besar.");
                AppError::invalid_form(errors)
            })?;

        Ok(NewSale {
            customer_id: request.customer_id,
            sale_date: request.sale_date,
            subtotal: totals.subtotal,
            discount: totals.discount,
            final_total: totals.final_total,
            payment_status: request.payment_status,
            note: request.note,
            items: vec![SaleItem {
                product_id: request.product_id,
                quantity: request.quantity,
                unit_price,
            }],
        })
    }

    /// Record a sale and take its quantities out of stock
    pub async fn create(&self, user_id: Id, sale: NewSale) -> AppResult<Id> {
        check_sale(&sale)?;

        let mut tx = self.db.begin().await?;

        let sale_id = sqlx::query_scalar::<_, Id>(
            r#"
            INSERT INTO sales (user_id, customer_id, sale_date, subtotal, discount, final_total,
                               payment_status, note)
            VALUES ($1, $2, COALESCE($3, NOW()), $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(sale.customer_id)
        .bind(sale.sale_date)
        .bind(sale.subtotal)
        .bind(sale.discount)
        .bind(sale.final_total)
        .bind(sale.payment_status.as_str())
        .bind(&sale.note)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from(e).missing_as("Customer"))?;

        for item in &sale.items {
            sqlx::query(
                r#"
                INSERT INTO sale_details (sale_id, product_id, quantity, unit_price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(sale_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from(e).missing_as(format!("Product {}", item.product_id)))?;
        }

        apply_movements(&mut tx, &sale_movements(&sale.items), self.missing_product).await?;

        tx.commit().await?;

        tracing::info!(
            sale_id,
            user_id,
            lines = sale.items.len(),
            final_total = %sale.final_total,
            "Sale recorded"
        );
        Ok(sale_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(subtotal: i64, discount: i64, final_total: i64) -> NewSale {
        NewSale {
            customer_id: None,
            sale_date: None,
            subtotal: Decimal::from(subtotal),
            discount: Decimal::from(discount),
            final_total: Decimal::from(final_total),
            payment_status: PaymentStatus::Unpaid,
            note: None,
            items: vec![SaleItem {
                product_id: 1,
                quantity: 5,
                unit_price: Decimal::from(150000),
            }],
        }
    }

    #[test]
    fn test_check_sale_accepts_consistent_totals() {
        assert!(check_sale(&sale(750000, 50000, 700000)).is_ok());
    }

    #[test]
    fn test_check_sale_rejects_mismatched_total() {
        match check_sale(&sale(750000, 50000, 750000)) {
            Err(AppError::Validation { errors, .. }) => assert!(errors.contains_key("total_akhir")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_check_sale_rejects_fraction_of_cent() {
        let mut unrounded = sale(100, 0, 100);
        unrounded.subtotal = Decimal::new(1000, 3);
        unrounded.discount = Decimal::new(5, 3);
        unrounded.final_total = Decimal::new(995, 3);
        match check_sale(&unrounded) {
            Err(AppError::Validation { errors, .. }) => assert!(errors.contains_key("total_akhir")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_check_sale_rejects_empty() {
        let mut empty = sale(0, 0, 0);
        empty.items.clear();
        assert!(check_sale(&empty).is_err());
    }
}
