//! Payments against purchases (payables) and sales (receivables)
//!
//! Payments never touch stock. A document whose payments cover its total is
//! marked `lunas`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::error::{AppError, AppResult};
use shared::models::{PaymentInput, PaymentKind};
use shared::types::{FieldErrors, Id, PaymentStatus};
use shared::validation::push_error;

/// Payment service
#[derive(Clone)]
pub struct PaymentService {
    db: PgPool,
}

/// A recorded payment
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Payment {
    pub id: Id,
    pub document_id: Id,
    pub payment_date: DateTime<Utc>,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Payments made against one document and what is still owed
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSummary {
    pub kind: PaymentKind,
    pub document_id: Id,
    pub total: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
    #[serde(rename = "status")]
    pub payment_status: PaymentStatus,
    pub payments: Vec<Payment>,
}

/// Table layout for one side of the books
struct Ledger {
    payments: &'static str,
    foreign_key: &'static str,
    documents: &'static str,
    total_column: &'static str,
    resource: &'static str,
}

fn ledger(kind: PaymentKind) -> Ledger {
    match kind {
        PaymentKind::Payable => Ledger {
            payments: "payment_payables",
            foreign_key: "purchase_id",
            documents: "purchases",
            total_column: "total",
            resource: "Purchase",
        },
        PaymentKind::Receivable => Ledger {
            payments: "payment_receivables",
            foreign_key: "sale_id",
            documents: "sales",
            total_column: "final_total",
            resource: "Sale",
        },
    }
}

/// Amount still owed after `paid`; never negative
pub fn outstanding(total: Decimal, paid: Decimal) -> Decimal {
    (total - paid).max(Decimal::ZERO)
}

/// Re-derive a document's payment status from its recorded payments after
/// its total changed. Documents without payments keep the status they were
/// entered with.
pub(crate) async fn resettle(
    conn: &mut PgConnection,
    kind: PaymentKind,
    document_id: Id,
) -> AppResult<Option<PaymentStatus>> {
    let l = ledger(kind);

    let (total, paid, payments) = sqlx::query_as::<_, (Decimal, Decimal, i64)>(&format!(
        r#"
        SELECT d.{total}, COALESCE(SUM(p.amount), 0), COUNT(p.id)
        FROM {documents} d
        LEFT JOIN {payments} p ON p.{fk} = d.id
        WHERE d.id = $1
        GROUP BY d.id, d.{total}
        "#,
        total = l.total_column,
        documents = l.documents,
        payments = l.payments,
        fk = l.foreign_key
    ))
    .bind(document_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound(l.resource.to_string()))?;

    if payments == 0 {
        return Ok(None);
    }

    let status = if outstanding(total, paid).is_zero() {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Unpaid
    };
    sqlx::query(&format!(
        "UPDATE {} SET payment_status = $2, updated_at = NOW() WHERE id = $1",
        l.documents
    ))
    .bind(document_id)
    .bind(status.as_str())
    .execute(&mut *conn)
    .await?;

    Ok(Some(status))
}

impl PaymentService {
    /// Create a new PaymentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Payments on a document with its outstanding balance
    pub async fn summary(&self, kind: PaymentKind, document_id: Id) -> AppResult<PaymentSummary> {
        let l = ledger(kind);

        let (total, status) = sqlx::query_as::<_, (Decimal, String)>(&format!(
            "SELECT {}, payment_status FROM {} WHERE id = $1",
            l.total_column, l.documents
        ))
        .bind(document_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(l.resource.to_string()))?;

        let payments = sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT id, {fk} AS document_id, payment_date, amount, created_at
            FROM {table}
            WHERE {fk} = $1
            ORDER BY payment_date ASC, id ASC
            "#,
            fk = l.foreign_key,
            table = l.payments
        ))
        .bind(document_id)
        .fetch_all(&self.db)
        .await?;

        let paid: Decimal = payments.iter().map(|p| p.amount).sum();
        let payment_status = status
            .parse::<PaymentStatus>()
            .map_err(AppError::Internal)?;

        Ok(PaymentSummary {
            kind,
            document_id,
            total,
            paid,
            outstanding: outstanding(total, paid),
            payment_status,
            payments,
        })
    }

    /// Record a payment, refusing more than is owed
    pub async fn record(
        &self,
        kind: PaymentKind,
        document_id: Id,
        input: PaymentInput,
    ) -> AppResult<Payment> {
        let l = ledger(kind);
        let mut tx = self.db.begin().await?;

        let total = sqlx::query_scalar::<_, Decimal>(&format!(
            "SELECT {} FROM {} WHERE id = $1 FOR UPDATE",
            l.total_column, l.documents
        ))
        .bind(document_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(l.resource.to_string()))?;

        let paid = sqlx::query_scalar::<_, Decimal>(&format!(
            "SELECT COALESCE(SUM(amount), 0) FROM {} WHERE {} = $1",
            l.payments, l.foreign_key
        ))
        .bind(document_id)
        .fetch_one(&mut *tx)
        .await?;

        let owed = outstanding(total, paid);
        if input.amount > owed {
            let mut errors = FieldErrors::new();
            push_error(
                &mut errors,
                "jumlah_bayar",
                format!("Jumlah bayar melebihi sisa tagihan ({}).", owed),
            );
            return Err(AppError::invalid_form(errors));
        }

        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            INSERT INTO {table} ({fk}, payment_date, amount)
            VALUES ($1, $2, $3)
            RETURNING id, {fk} AS document_id, payment_date, amount, created_at
            "#,
            fk = l.foreign_key,
            table = l.payments
        ))
        .bind(document_id)
        .bind(input.payment_date)
        .bind(input.amount)
        .fetch_one(&mut *tx)
        .await?;

        if resettle(&mut tx, kind, document_id).await? == Some(PaymentStatus::Paid) {
            tracing::info!(?kind, document_id, "Document settled");
        }

        tx.commit().await?;

        tracing::info!(?kind, document_id, amount = %input.amount, "Payment recorded");
        Ok(payment)
    }
}
