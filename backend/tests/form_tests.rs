//! Form parsing tests
//!
//! Tests for the back-office forms including:
//! - Identifier parsing on path segments and select fields
//! - Number coercion rules
//! - Error collection across fields

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::forms::{CustomerForm, ExpenseForm, ProductForm, PurchaseForm, SaleForm};
use shared::types::{parse_id, IdError, PaymentStatus};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_expense_form_valid() {
        let input = ExpenseForm {
            tanggal_pengeluaran: Some("2025-03-01".into()),
            jenis_pengeluaran: "Operasional".into(),
            nominal: Some("150000".into()),
            keterangan: Some("Bayar listrik toko".into()),
        }
        .parse()
        .unwrap();

        assert_eq!(input.category, "Operasional");
        assert_eq!(input.amount, Decimal::from(150000));
        assert_eq!(input.expense_date, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_expense_form_blank_amount_is_zero_and_rejected() {
        let errors = ExpenseForm {
            tanggal_pengeluaran: Some("2025-03-01".into()),
            jenis_pengeluaran: "Op".into(),
            nominal: Some("".into()),
            keterangan: None,
        }
        .parse()
        .unwrap_err();

        assert_eq!(errors["nominal"], vec!["Nominal harus lebih besar dari 0."]);
        assert_eq!(errors["jenis_pengeluaran"], vec!["Jenis pengeluaran minimal 3 karakter."]);
    }

    #[test]
    fn test_product_form_rejects_fractional_stock() {
        let errors = ProductForm {
            nama_barang: "Daging Ribeye".into(),
            stok: Some("2.5".into()),
            harga_jual: Some("170000".into()),
            harga_beli_terakhir: Some("135000".into()),
        }
        .parse()
        .unwrap_err();

        assert_eq!(errors["stok"], vec!["Expected integer, received float"]);
    }

    #[test]
    fn test_purchase_form_paid_status() {
        let purchase = PurchaseForm {
            product_id: Some("1".into()),
            supplier_id: Some("1".into()),
            jumlah: Some("2".into()),
            harga_beli: Some("100000".into()),
            tanggal_pembelian: Some("2025-03-01T08:30".into()),
            status_pembayaran: Some("lunas".into()),
            note: None,
        }
        .parse()
        .unwrap();

        assert_eq!(purchase.payment_status, PaymentStatus::Paid);
        assert!(purchase.purchase_date.is_some());
    }

    #[test]
    fn test_purchase_form_unknown_status() {
        let errors = PurchaseForm {
            product_id: Some("1".into()),
            supplier_id: Some("1".into()),
            jumlah: Some("2".into()),
            harga_beli: Some("100000".into()),
            tanggal_pembelian: Some("2025-03-01".into()),
            status_pembayaran: Some("dicicil".into()),
            note: None,
        }
        .parse()
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors["status_pembayaran"][0].contains("dicicil"));
    }

    #[test]
    fn test_sale_form_keeps_customer_and_discount() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let request = SaleForm {
            product_id: Some("1".into()),
            customer_id: Some("4".into()),
            jumlah: Some("5".into()),
            discount: Some("10".into()),
            tanggal_penjualan: Some("2025-02-28T10:00".into()),
            status_pembayaran: Some("lunas".into()),
            note: Some("Tempo 7 hari".into()),
        }
        .parse(now)
        .unwrap();

        assert_eq!(request.customer_id, Some(4));
        assert_eq!(request.discount_percent, Decimal::from(10));
        assert_eq!(request.sale_date, Some(Utc.with_ymd_and_hms(2025, 2, 28, 10, 0, 0).unwrap()));
        assert_eq!(request.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_sale_form_discount_over_hundred() {
        let now = Utc::now();
        let errors = SaleForm {
            product_id: Some("1".into()),
            jumlah: Some("1".into()),
            discount: Some("150".into()),
            ..Default::default()
        }
        .parse(now)
        .unwrap_err();

        assert!(errors.contains_key("discount"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every positive integer, however padded, parses to itself
        #[test]
        fn prop_parse_id_accepts_positive(id in 1i64..i64::MAX, left in 0usize..3, right in 0usize..3) {
            let raw = format!("{}{}{}", " ".repeat(left), id, " ".repeat(right));
            prop_assert_eq!(parse_id(&raw), Ok(id));
        }

        /// Anything with a non-digit inside never parses
        #[test]
        fn prop_parse_id_rejects_embedded_text(prefix in 1i64..10_000, junk in "[a-zA-Z_.]{1,4}") {
            let raw = format!("{}{}", prefix, junk);
            prop_assert!(matches!(parse_id(&raw), Err(IdError::NotNumeric(_))));
        }

        /// Negative stock is always rejected, non-negative always accepted
        #[test]
        fn prop_product_stock_sign(stock in -1000i32..1000) {
            let result = ProductForm {
                nama_barang: "Daging Sirloin".into(),
                stok: Some(stock.to_string()),
                harga_jual: Some("150000".into()),
                harga_beli_terakhir: Some("120000".into()),
            }
            .parse();

            prop_assert_eq!(result.is_ok(), stock >= 0);
        }

        /// Contacts shorter than eight characters are refused once filled in
        #[test]
        fn prop_customer_contact_length(contact in "[0-9]{1,14}") {
            let result = CustomerForm {
                nama_pelanggan: "Budi Resto".into(),
                kontak: Some(contact.clone()),
            }
            .parse();

            prop_assert_eq!(result.is_ok(), contact.len() >= 8);
        }
    }
}
