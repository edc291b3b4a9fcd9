//! Payment models for payables (purchases) and receivables (sales)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A partial payment against a purchase or a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInput {
    pub payment_date: DateTime<Utc>,
    pub amount: Decimal,
}

/// Which side of the books a payment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Paid to a supplier against a purchase
    Payable,
    /// Received from a customer against a sale
    Receivable,
}
