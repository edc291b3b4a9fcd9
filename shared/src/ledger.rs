//! Stock ledger arithmetic
//!
//! A purchase or sale line changes the stock counter of the product it names.
//! These functions turn line items into [`StockMovement`]s and compute the
//! document totals; the backend applies the movements inside a database
//! transaction, in the order they are returned.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{LineItem, PurchaseItem, SaleItem};
use crate::types::Id;
use crate::validation::round_money;

/// A signed change to one product's stock counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub product_id: Id,
    pub delta: i32,
    /// Overwrites the product's last purchase price when set
    pub last_purchase_price: Option<Decimal>,
}

/// Movements recorded by a purchase: stock goes up and the line price
/// becomes the product's last purchase price.
pub fn purchase_movements(items: &[PurchaseItem]) -> Vec<StockMovement> {
    items
        .iter()
        .map(|item| StockMovement {
            product_id: item.product_id,
            delta: item.quantity,
            last_purchase_price: Some(item.unit_price),
        })
        .collect()
}

/// Movements that undo previously applied purchase lines
pub fn revert_movements<L: LineItem>(lines: &[L]) -> Vec<StockMovement> {
    lines
        .iter()
        .map(|line| StockMovement {
            product_id: line.product_id(),
            delta: -line.quantity(),
            last_purchase_price: None,
        })
        .collect()
}

/// Movements recorded by a sale: stock goes down
pub fn sale_movements(items: &[SaleItem]) -> Vec<StockMovement> {
    items
        .iter()
        .map(|item| StockMovement {
            product_id: item.product_id,
            delta: -item.quantity,
            last_purchase_price: None,
        })
        .collect()
}

/// Net per-product stock change of replacing `old` lines with `new` lines
pub fn net_stock_effect<A: LineItem, B: LineItem>(old: &[A], new: &[B]) -> BTreeMap<Id, i64> {
    let mut net: BTreeMap<Id, i64> = BTreeMap::new();
    for line in old {
        *net.entry(line.product_id()).or_default() -= i64::from(line.quantity());
    }
    for line in new {
        *net.entry(line.product_id()).or_default() += i64::from(line.quantity());
    }
    net.retain(|_, delta| *delta != 0);
    net
}

/// Sum of quantity × unit price over the lines, or `None` if it overflows
pub fn purchase_total(items: &[PurchaseItem]) -> Option<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        Decimal::from(item.quantity)
            .checked_mul(item.unit_price)
            .and_then(|line| total.checked_add(line))
    })
}

/// Money figures of a single-line sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTotals {
    pub subtotal: Decimal,
    /// Discount as an amount in whole cents, not a percentage
    pub discount: Decimal,
    pub final_total: Decimal,
}

impl SaleTotals {
    /// Totals for `quantity` units at `unit_price` with a percentage discount.
    /// The discount is rounded to cents before it is subtracted, so
    /// `final_total == subtotal - discount` holds after storage too.
    pub fn from_percent(unit_price: Decimal, quantity: i32, discount_percent: Decimal) -> Option<Self> {
        let subtotal = unit_price.checked_mul(Decimal::from(quantity))?;
        let discount = round_money(
            subtotal
                .checked_mul(discount_percent)?
                .checked_div(Decimal::ONE_HUNDRED)?,
        );
        Some(Self {
            subtotal,
            discount,
            final_total: subtotal.checked_sub(discount)?,
        })
    }
}
