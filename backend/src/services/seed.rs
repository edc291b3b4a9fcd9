//! Demo data for a fresh database
//!
//! Wipes every table and inserts a small shop: two accounts, a supplier,
//! two customers, three cuts of beef and a handful of documents. Documents
//! are inserted as-is; stock counters keep their seeded values.

use bcrypt::hash;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::error::{AppError, AppResult};
use shared::types::{Id, PaymentStatus, UserRole};

/// Seed service
#[derive(Clone)]
pub struct SeedService {
    db: PgPool,
}

/// Row counts written by a seed run
#[derive(Debug, Default, Serialize)]
pub struct SeedReport {
    pub users: usize,
    pub suppliers: usize,
    pub customers: usize,
    pub products: usize,
    pub purchases: usize,
    pub sales: usize,
    pub expenses: usize,
    pub payments: usize,
}

struct SeedUser {
    name: &'static str,
    username: &'static str,
    password: &'static str,
    role: UserRole,
}

const USERS: [SeedUser; 2] = [
    SeedUser {
        name: "Imam Rafi",
        username: "imamrafi",
        password: "Imamrafi?2255",
        role: UserRole::Admin,
    },
    SeedUser {
        name: "Kasir Sapi Seto",
        username: "kasir",
        password: "password123",
        role: UserRole::Cashier,
    },
];

/// (name, stock, selling price, last purchase price)
const PRODUCTS: [(&str, i32, i64, i64); 3] = [
    ("Daging Sirloin (per kg)", 50, 150000, 120000),
    ("Daging Ribeye (per kg)", 30, 170000, 135000),
    ("Daging Tenderloin (per kg)", 25, 200000, 160000),
];

impl SeedService {
    /// Create a new SeedService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Replace all data with the demo set
    pub async fn run(&self, bcrypt_cost: u32) -> AppResult<SeedReport> {
        let mut report = SeedReport::default();
        let mut tx = self.db.begin().await?;

        tracing::info!("Removing existing data...");
        sqlx::query(
            r#"
            TRUNCATE payment_payables, payment_receivables, purchase_details, sale_details,
                     expenses, purchases, sales, customers, suppliers, products, users
            RESTART IDENTITY
            "#,
        )
        .execute(&mut *tx)
        .await?;

        tracing::info!("Creating users...");
        let mut user_ids = Vec::with_capacity(USERS.len());
        for user in &USERS {
            let password_hash = hash(user.password, bcrypt_cost)
                .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;
            let id = sqlx::query_scalar::<_, Id>(
                r#"
                INSERT INTO users (name, username, password_hash, role)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(user.name)
            .bind(user.username)
            .bind(&password_hash)
            .bind(user.role.as_str())
            .fetch_one(&mut *tx)
            .await?;
            user_ids.push(id);
            report.users += 1;
        }
        let (admin_id, kasir_id) = (user_ids[0], user_ids[1]);

        tracing::info!("Creating suppliers and customers...");
        let supplier_id = insert_party(&mut tx, "suppliers", "Peternakan Jaya Abadi", Some("08123456789")).await?;
        report.suppliers += 1;
        let budi_id = insert_party(&mut tx, "customers", "Budi Resto", Some("08987654321")).await?;
        let walk_in_id = insert_party(&mut tx, "customers", "Pelanggan Walk-in", None).await?;
        report.customers += 2;

        tracing::info!("Creating products...");
        let mut product_ids = Vec::with_capacity(PRODUCTS.len());
        for (name, stock, selling, bought) in PRODUCTS {
            let id = sqlx::query_scalar::<_, Id>(
                r#"
                INSERT INTO products (name, stock, selling_price, last_purchase_price)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(name)
            .bind(stock)
            .bind(Decimal::from(selling))
            .bind(Decimal::from(bought))
            .fetch_one(&mut *tx)
            .await?;
            product_ids.push(id);
            report.products += 1;
        }
        let (sirloin_id, ribeye_id) = (product_ids[0], product_ids[1]);

        let now = Utc::now();

        tracing::info!("Creating purchases...");
        let purchase_id = sqlx::query_scalar::<_, Id>(
            r#"
            INSERT INTO purchases (user_id, supplier_id, purchase_date, total, payment_status, note)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(admin_id)
        .bind(supplier_id)
        .bind(now - Duration::days(5))
        .bind(Decimal::from(1_200_000))
        .bind(PaymentStatus::Unpaid.as_str())
        .bind("Stok sirloin")
        .fetch_one(&mut *tx)
        .await?;
        insert_line(&mut tx, "purchase_details", "purchase_id", purchase_id, sirloin_id, 10, 120000).await?;
        report.purchases += 1;

        tracing::info!("Creating sales...");
        let walk_in_sale = insert_sale(
            &mut tx,
            kasir_id,
            walk_in_id,
            now - Duration::days(1),
            (340000, 0, 340000),
            PaymentStatus::Paid,
            None,
        )
        .await?;
        insert_line(&mut tx, "sale_details", "sale_id", walk_in_sale, ribeye_id, 2, 170000).await?;

        let credit_sale = insert_sale(
            &mut tx,
            kasir_id,
            budi_id,
            now,
            (750000, 50000, 700000),
            PaymentStatus::Unpaid,
            Some("Tempo 7 hari"),
        )
        .await?;
        insert_line(&mut tx, "sale_details", "sale_id", credit_sale, sirloin_id, 5, 150000).await?;
        report.sales += 2;

        tracing::info!("Creating expenses...");
        sqlx::query(
            r#"
            INSERT INTO expenses (user_id, expense_date, category, amount, description)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(admin_id)
        .bind(now)
        .bind("Operasional")
        .bind(Decimal::from(150000))
        .bind("Bayar listrik toko")
        .execute(&mut *tx)
        .await?;
        report.expenses += 1;

        tracing::info!("Creating payments...");
        sqlx::query("INSERT INTO payment_payables (purchase_id, payment_date, amount) VALUES ($1, $2, $3)")
            .bind(purchase_id)
            .bind(now)
            .bind(Decimal::from(500000))
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO payment_receivables (sale_id, payment_date, amount) VALUES ($1, $2, $3)")
            .bind(credit_sale)
            .bind(now)
            .bind(Decimal::from(300000))
            .execute(&mut *tx)
            .await?;
        report.payments += 2;

        tx.commit().await?;

        Ok(report)
    }
}

async fn insert_party(
    conn: &mut PgConnection,
    table: &str,
    name: &str,
    contact: Option<&str>,
) -> AppResult<Id> {
    let id = sqlx::query_scalar::<_, Id>(&format!(
        "INSERT INTO {} (name, contact) VALUES ($1, $2) RETURNING id",
        table
    ))
    .bind(name)
    .bind(contact)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

async fn insert_line(
    conn: &mut PgConnection,
    table: &str,
    header_column: &str,
    header_id: Id,
    product_id: Id,
    quantity: i32,
    unit_price: i64,
) -> AppResult<()> {
    sqlx::query(&format!(
        "INSERT INTO {} ({}, product_id, quantity, unit_price) VALUES ($1, $2, $3, $4)",
        table, header_column
    ))
    .bind(header_id)
    .bind(product_id)
    .bind(quantity)
    .bind(Decimal::from(unit_price))
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn insert_sale(
    conn: &mut PgConnection,
    user_id: Id,
    customer_id: Id,
    sale_date: chrono::DateTime<Utc>,
    (subtotal, discount, final_total): (i64, i64, i64),
    status: PaymentStatus,
    note: Option<&str>,
) -> AppResult<Id> {
    let id = sqlx::query_scalar::<_, Id>(
        r#"
        INSERT INTO sales (user_id, customer_id, sale_date, subtotal, discount, final_total,
                           payment_status, note)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(customer_id)
    .bind(sale_date)
    .bind(Decimal::from(subtotal))
    .bind(Decimal::from(discount))
    .bind(Decimal::from(final_total))
    .bind(status.as_str())
    .bind(note)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}
