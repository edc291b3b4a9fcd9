//! Product models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Values for creating or replacing a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    /// Units on hand
    pub stock: i32,
    pub selling_price: Decimal,
    pub last_purchase_price: Decimal,
}
