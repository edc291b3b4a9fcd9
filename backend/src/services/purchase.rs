//! Purchase ledger service
//!
//! Recording, editing or deleting a purchase writes the header and line rows
//! and moves product stock in a single transaction. An error anywhere drops
//! the transaction, which rolls back every row and stock change made so far.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::ledger::{apply_movements, MissingProduct};
use crate::services::payment::resettle;
use shared::ledger::{purchase_movements, purchase_total, revert_movements};
use shared::models::{LineItem, NewPurchase, PaymentKind, PurchaseChanges, PurchaseItem};
use shared::types::{FieldErrors, Id, PaymentStatus};
use shared::validation::{is_money, push_error, MAX_MONEY};

/// Purchase service
#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
}

/// Purchase header
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Purchase {
    pub id: Id,
    pub user_id: Id,
    pub supplier_id: Id,
    pub supplier_name: String,
    pub purchase_date: DateTime<Utc>,
    pub total: Decimal,
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Purchase line
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PurchaseDetail {
    pub id: Id,
    pub purchase_id: Id,
    pub product_id: Id,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl LineItem for PurchaseDetail {
    fn product_id(&self) -> Id {
        self.product_id
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }
}

/// Purchase with its lines
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseWithItems {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub items: Vec<PurchaseDetail>,
}

const PURCHASE_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.supplier_id, s.name AS supplier_name, p.purchase_date,
           p.total, p.payment_status, p.note, p.created_at, p.updated_at
    FROM purchases p
    JOIN suppliers s ON s.id = p.supplier_id
"#;

const DETAIL_SELECT: &str = r#"
    SELECT d.id, d.purchase_id, d.product_id, pr.name AS product_name, d.quantity, d.unit_price
    FROM purchase_details d
    JOIN products pr ON pr.id = d.product_id
"#;

/// Reject line items the ledger cannot record; returns the purchase total
pub fn check_items(items: &[PurchaseItem]) -> AppResult<Decimal> {
    let mut errors = FieldErrors::new();
    if items.is_empty() {
        push_error(&mut errors, "items", "Minimal satu barang harus diisi.");
    }
    for item in items {
        if item.quantity < 1 {
            push_error(&mut errors, "jumlah", "Jumlah minimal 1.");
        }
        if item.unit_price <= Decimal::ZERO {
            push_error(&mut errors, "harga_beli", "Harga beli harus lebih dari 0");
        } else if !is_money(item.unit_price) {
            push_error(&mut errors, "harga_beli", "Maksimal 2 angka di belakang koma.");
        }
    }
    let total = purchase_total(items).filter(|total| *total <= MAX_MONEY);
    if total.is_none() {
        push_error(&mut errors, "jumlah", "Total pembelian terlalu besar.");
    }

    match total {
        Some(total) if errors.is_empty() => Ok(total),
        _ => Err(AppError::invalid_form(errors)),
    }
}

impl PurchaseService {
    /// Create a new PurchaseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All purchases with lines, newest first
    pub async fn list(&self) -> AppResult<Vec<PurchaseWithItems>> {
        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            "{} ORDER BY p.purchase_date DESC, p.id DESC",
            PURCHASE_SELECT
        ))
        .fetch_all(&self.db)
        .await?;

        let ids: Vec<Id> = purchases.iter().map(|p| p.id).collect();
        let details = sqlx::query_as::<_, PurchaseDetail>(&format!(
            "{} WHERE d.purchase_id = ANY($1) ORDER BY d.id",
            DETAIL_SELECT
        ))
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        let mut by_purchase: HashMap<Id, Vec<PurchaseDetail>> = HashMap::new();
        for detail in details {
            by_purchase.entry(detail.purchase_id).or_default().push(detail);
        }

        Ok(purchases
            .into_iter()
            .map(|purchase| {
                let items = by_purchase.remove(&purchase.id).unwrap_or_default();
                PurchaseWithItems { purchase, items }
            })
            .collect())
    }

    pub async fn get(&self, id: Id) -> AppResult<PurchaseWithItems> {
        let purchase = sqlx::query_as::<_, Purchase>(&format!("{} WHERE p.id = $1", PURCHASE_SELECT))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let mut conn = self.db.acquire().await?;
        let items = Self::details(&mut conn, id).await?;

        Ok(PurchaseWithItems { purchase, items })
    }

    /// Record a purchase and add its quantities to stock
    pub async fn create(&self, user_id: Id, input: NewPurchase) -> AppResult<Id> {
        let total = check_items(&input.items)?;

        let mut tx = self.db.begin().await?;

        let purchase_id = sqlx::query_scalar::<_, Id>(
            r#"
            INSERT INTO purchases (user_id, supplier_id, purchase_date, total, payment_status, note)
            VALUES ($1, $2, COALESCE($3, NOW()), $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(input.supplier_id)
        .bind(input.purchase_date)
        .bind(total)
        .bind(input.payment_status.as_str())
        .bind(&input.note)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from(e).missing_as("Supplier"))?;

        Self::record_items(&mut tx, purchase_id, &input.items).await?;

        tx.commit().await?;

        tracing::info!(
            purchase_id,
            supplier_id = input.supplier_id,
            lines = input.items.len(),
            %total,
            "Purchase recorded"
        );
        Ok(purchase_id)
    }

    /// Replace supplier and lines. Old quantities leave stock before the new ones arrive.
    pub async fn update(&self, id: Id, changes: PurchaseChanges) -> AppResult<()> {
        let total = check_items(&changes.items)?;

        let mut tx = self.db.begin().await?;

        Self::lock_header(&mut tx, id).await?;
        let old_items = Self::details(&mut tx, id).await?;
        apply_movements(&mut tx, &revert_movements(&old_items), MissingProduct::Fail).await?;

        sqlx::query("DELETE FROM purchase_details WHERE purchase_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE purchases
            SET supplier_id = $2, total = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.supplier_id)
        .bind(total)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from(e).missing_as("Supplier"))?;

        Self::record_items(&mut tx, id, &changes.items).await?;
        let status = resettle(&mut tx, PaymentKind::Payable, id).await?;

        tx.commit().await?;

        tracing::info!(
            purchase_id = id,
            old_lines = old_items.len(),
            new_lines = changes.items.len(),
            %total,
            ?status,
            "Purchase updated"
        );
        Ok(())
    }

    /// Delete a purchase and take its quantities back out of stock
    pub async fn delete(&self, id: Id) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        Self::lock_header(&mut tx, id).await?;
        let old_items = Self::details(&mut tx, id).await?;
        apply_movements(&mut tx, &revert_movements(&old_items), MissingProduct::Fail).await?;

        // Lines and payments cascade
        sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(purchase_id = id, lines = old_items.len(), "Purchase deleted");
        Ok(())
    }

    async fn lock_header(conn: &mut PgConnection, id: Id) -> AppResult<()> {
        sqlx::query_scalar::<_, Id>("SELECT id FROM purchases WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Purchase".to_string()))
    }

    async fn details(conn: &mut PgConnection, purchase_id: Id) -> AppResult<Vec<PurchaseDetail>> {
        let details = sqlx::query_as::<_, PurchaseDetail>(&format!(
            "{} WHERE d.purchase_id = $1 ORDER BY d.id",
            DETAIL_SELECT
        ))
        .bind(purchase_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(details)
    }

    /// Insert each line and apply its movement, line by line
    async fn record_items(
        conn: &mut PgConnection,
        purchase_id: Id,
        items: &[PurchaseItem],
    ) -> AppResult<()> {
        let movements = purchase_movements(items);
        for (item, movement) in items.iter().zip(movements.iter()) {
            sqlx::query(
                r#"
                INSERT INTO purchase_details (purchase_id, product_id, quantity, unit_price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(purchase_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::from(e).missing_as(format!("Product {}", item.product_id)))?;

            apply_movements(conn, std::slice::from_ref(movement), MissingProduct::Fail).await?;
        }

        Ok(())
    }
}
