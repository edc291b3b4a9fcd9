//! Expense models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Values for recording or replacing an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseInput {
    pub expense_date: DateTime<Utc>,
    /// Free-text category, e.g. "Operasional"
    pub category: String,
    pub amount: Decimal,
    pub description: Option<String>,
}
