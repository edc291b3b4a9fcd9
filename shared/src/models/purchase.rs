//! Purchase models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LineItem;
use crate::types::{Id, PaymentStatus};

/// One line of a purchase as submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub product_id: Id,
    pub quantity: i32,
    /// Price paid per unit (`harga_saat_beli`)
    pub unit_price: Decimal,
}

impl LineItem for PurchaseItem {
    fn product_id(&self) -> Id {
        self.product_id
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }
}

/// A purchase to record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub supplier_id: Id,
    /// Defaults to now
    pub purchase_date: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    pub note: Option<String>,
    pub items: Vec<PurchaseItem>,
}

/// Replacement supplier and line items for an existing purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseChanges {
    pub supplier_id: Id,
    pub items: Vec<PurchaseItem>,
}
