//! Stock ledger tests
//!
//! Replays ledger movements against an in-memory stock book to check:
//! - Purchases add their quantities and set the last purchase price
//! - Updates move stock by the net difference between old and new lines
//! - Deletes fully revert a purchase
//! - Sale totals always satisfy final = subtotal - discount

use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::ledger::{
    net_stock_effect, purchase_movements, purchase_total, revert_movements, sale_movements,
    SaleTotals, StockMovement,
};
use shared::models::{PurchaseItem, SaleItem};
use shared::types::Id;

/// Products as the database would hold them: stock and last purchase price
#[derive(Debug, Clone, Default, PartialEq)]
struct StockBook {
    products: BTreeMap<Id, (i64, Decimal)>,
}

impl StockBook {
    fn with(products: &[(Id, i64)]) -> Self {
        Self {
            products: products
                .iter()
                .map(|&(id, stock)| (id, (stock, Decimal::ZERO)))
                .collect(),
        }
    }

    /// Mirrors the UPDATE issued per movement; false when the product is missing
    fn apply(&mut self, movements: &[StockMovement]) -> bool {
        for m in movements {
            match self.products.get_mut(&m.product_id) {
                Some((stock, price)) => {
                    *stock += i64::from(m.delta);
                    if let Some(p) = m.last_purchase_price {
                        *price = p;
                    }
                }
                None => return false,
            }
        }
        true
    }

    fn stock(&self, id: Id) -> i64 {
        self.products[&id].0
    }

    fn price(&self, id: Id) -> Decimal {
        self.products[&id].1
    }
}

fn buy(product_id: Id, quantity: i32, price: i64) -> PurchaseItem {
    PurchaseItem {
        product_id,
        quantity,
        unit_price: Decimal::from(price),
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[cfg(test)]
mod scenarios {
    use super::*;

    /// Stock 50; purchase 10 -> 60; edit to 5 -> 55; delete -> 50
    #[test]
    fn test_purchase_lifecycle() {
        let sirloin = 1;
        let mut book = StockBook::with(&[(sirloin, 50)]);

        let created = vec![buy(sirloin, 10, 120000)];
        assert!(book.apply(&purchase_movements(&created)));
        assert_eq!(book.stock(sirloin), 60);
        assert_eq!(book.price(sirloin), Decimal::from(120000));

        let edited = vec![buy(sirloin, 5, 118000)];
        assert!(book.apply(&revert_movements(&created)));
        assert!(book.apply(&purchase_movements(&edited)));
        assert_eq!(book.stock(sirloin), 55);
        assert_eq!(book.price(sirloin), Decimal::from(118000));

        assert!(book.apply(&revert_movements(&edited)));
        assert_eq!(book.stock(sirloin), 50);
    }

    /// Selling 2 of 60 leaves 58
    #[test]
    fn test_sale_decrements_stock() {
        let ribeye = 2;
        let mut book = StockBook::with(&[(ribeye, 60)]);
        let items = vec![SaleItem {
            product_id: ribeye,
            quantity: 2,
            unit_price: Decimal::from(170000),
        }];

        assert!(book.apply(&sale_movements(&items)));
        assert_eq!(book.stock(ribeye), 58);

        let totals = SaleTotals::from_percent(items[0].unit_price, items[0].quantity, Decimal::ZERO)
            .unwrap();
        assert_eq!(totals.final_total, totals.subtotal - totals.discount);
        assert_eq!(totals.final_total, Decimal::from(340000));
    }

    /// Stock may go below zero; nothing enforces a minimum
    #[test]
    fn test_stock_can_go_negative() {
        let mut book = StockBook::with(&[(1, 1)]);
        let items = vec![SaleItem {
            product_id: 1,
            quantity: 3,
            unit_price: Decimal::ONE,
        }];
        assert!(book.apply(&sale_movements(&items)));
        assert_eq!(book.stock(1), -2);
    }

    /// The last line wins the last purchase price
    #[test]
    fn test_repeated_product_takes_last_price() {
        let mut book = StockBook::with(&[(1, 0)]);
        let items = vec![buy(1, 1, 100), buy(1, 2, 90)];
        book.apply(&purchase_movements(&items));
        assert_eq!(book.stock(1), 3);
        assert_eq!(book.price(1), Decimal::from(90));
        assert_eq!(purchase_total(&items), Some(Decimal::from(280)));
    }

    #[test]
    fn test_missing_product_is_reported() {
        let mut book = StockBook::with(&[(1, 10)]);
        assert!(!book.apply(&purchase_movements(&[buy(99, 1, 1)])));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn items_strategy() -> impl Strategy<Value = Vec<PurchaseItem>> {
        prop::collection::vec((1i64..6, 1i32..100, 1i64..500_000), 1..8)
            .prop_map(|lines| lines.into_iter().map(|(p, q, c)| buy(p, q, c)).collect())
    }

    fn catalogue() -> StockBook {
        StockBook::with(&[(1, 50), (2, 30), (3, 25), (4, 0), (5, 100)])
    }

    fn quantity_by_product(items: &[PurchaseItem]) -> BTreeMap<Id, i64> {
        let mut out = BTreeMap::new();
        for item in items {
            *out.entry(item.product_id).or_insert(0) += i64::from(item.quantity);
        }
        out
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Stock after a purchase = stock before + quantities bought
        #[test]
        fn prop_purchase_adds_quantities(items in items_strategy()) {
            let before = catalogue();
            let mut after = before.clone();
            prop_assert!(after.apply(&purchase_movements(&items)));

            let bought = quantity_by_product(&items);
            for (id, (stock, _)) in &after.products {
                let added = bought.get(id).copied().unwrap_or(0);
                prop_assert_eq!(*stock, before.stock(*id) + added);
            }
        }

        /// Last purchase price equals the price on the last line for that product
        #[test]
        fn prop_last_line_sets_price(items in items_strategy()) {
            let mut book = catalogue();
            book.apply(&purchase_movements(&items));

            for (id, _) in quantity_by_product(&items) {
                let last = items.iter().rev().find(|i| i.product_id == id).map(|i| i.unit_price);
                prop_assert_eq!(Some(book.price(id)), last);
            }
        }

        /// Editing moves stock by exactly the net difference of the lines
        #[test]
        fn prop_update_applies_net_effect(old in items_strategy(), new in items_strategy()) {
            let mut book = catalogue();
            book.apply(&purchase_movements(&old));
            let before_update = book.clone();

            book.apply(&revert_movements(&old));
            book.apply(&purchase_movements(&new));

            let net = net_stock_effect(&old, &new);
            for (id, (stock, _)) in &book.products {
                let delta = net.get(id).copied().unwrap_or(0);
                prop_assert_eq!(*stock, before_update.stock(*id) + delta);
            }
        }

        /// Deleting a purchase restores every counter
        #[test]
        fn prop_delete_reverts_purchase(items in items_strategy()) {
            let before = catalogue();
            let mut book = before.clone();
            book.apply(&purchase_movements(&items));
            book.apply(&revert_movements(&items));

            for (id, (stock, _)) in &book.products {
                prop_assert_eq!(*stock, before.stock(*id));
            }
        }

        /// Header total matches the lines
        #[test]
        fn prop_purchase_total_is_sum_of_lines(items in items_strategy()) {
            let expected: Decimal = items
                .iter()
                .map(|i| i.unit_price * Decimal::from(i.quantity))
                .sum();
            prop_assert_eq!(purchase_total(&items), Some(expected));
        }

        /// final = subtotal - discount in whole cents, and discount never exceeds subtotal
        #[test]
        fn prop_sale_totals_consistent(
            price_cents in 1i64..100_000_000,
            quantity in 1i32..1000,
            percent_hundredths in 0u32..=10_000,
        ) {
            let price = Decimal::new(price_cents, 2);
            let percent = Decimal::new(i64::from(percent_hundredths), 2);
            let totals = SaleTotals::from_percent(price, quantity, percent).unwrap();

            prop_assert_eq!(totals.subtotal, price * Decimal::from(quantity));
            prop_assert!(totals.subtotal.normalize().scale() <= 2);
            prop_assert!(totals.discount.normalize().scale() <= 2);
            prop_assert!(totals.final_total.normalize().scale() <= 2);
            prop_assert_eq!(totals.final_total, totals.subtotal - totals.discount);
            prop_assert!(totals.discount <= totals.subtotal);
            prop_assert!(totals.final_total >= Decimal::ZERO);
        }
    }
}
