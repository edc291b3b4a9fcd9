//! Sale models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LineItem;
use crate::types::{Id, PaymentStatus};

/// One line of a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub product_id: Id,
    pub quantity: i32,
    /// Price charged per unit (`harga_saat_jual`)
    pub unit_price: Decimal,
}

impl LineItem for SaleItem {
    fn product_id(&self) -> Id {
        self.product_id
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }
}

/// A fully priced sale ready to be recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub customer_id: Option<Id>,
    pub sale_date: Option<DateTime<Utc>>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub final_total: Decimal,
    pub payment_status: PaymentStatus,
    pub note: Option<String>,
    pub items: Vec<SaleItem>,
}

/// What the cashier enters: the price comes from the product's selling price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRequest {
    pub product_id: Id,
    pub quantity: i32,
    pub discount_percent: Decimal,
    pub customer_id: Option<Id>,
    pub sale_date: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    pub note: Option<String>,
}
