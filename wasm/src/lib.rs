//! WebAssembly module for the Sapi Seto back office
//!
//! Runs the same arithmetic and form rules as the server so the pages can
//! show totals and field errors before a form is posted:
//! - Sale totals preview (subtotal, discount, final total)
//! - Purchase totals
//! - Form validation with the server's field error messages

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::forms::{
    CustomerForm, ExpenseForm, PaymentForm, ProductForm, PurchaseForm, SaleForm, SupplierForm,
};
use shared::ledger::{purchase_total, SaleTotals};
use shared::models::PurchaseItem;
use shared::types::FieldErrors;
use shared::validation::is_money;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("sapi-seto-wasm loaded"));
}

fn js_error(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization failed", e))
}

fn parse_decimal(raw: &str, field: &str) -> Result<Decimal, JsValue> {
    Decimal::from_str(raw.trim()).map_err(|e| js_error(field, e))
}

/// Browser clock (`Date.now()`) as a UTC timestamp
fn timestamp(now_ms: f64) -> Result<DateTime<Utc>, JsValue> {
    DateTime::from_timestamp_millis(now_ms as i64)
        .ok_or_else(|| JsValue::from_str("Invalid timestamp"))
}

/// Field errors of a parsed form as a JSON object; `{}` when the form is valid
fn field_errors<F, T>(form_json: &str, parse: impl FnOnce(F) -> Result<T, FieldErrors>) -> Result<String, JsValue>
where
    F: DeserializeOwned,
{
    let form: F = serde_json::from_str(form_json).map_err(|e| js_error("Invalid form JSON", e))?;
    let errors = parse(form).err().unwrap_or_default();
    to_json(&errors)
}

/// Sale totals for one product line, returned as JSON
/// `{"subtotal": "...", "discount": "...", "final_total": "..."}`
#[wasm_bindgen]
pub fn preview_sale_totals(
    selling_price: &str,
    quantity: i32,
    discount_percent: &str,
) -> Result<String, JsValue> {
    let unit_price = parse_decimal(selling_price, "harga_jual")?;
    if !is_money(unit_price) {
        return Err(JsValue::from_str("harga_jual: not a money amount"));
    }
    let percent = parse_decimal(discount_percent, "discount")?;
    let totals = SaleTotals::from_percent(unit_price, quantity, percent)
        .ok_or_else(|| JsValue::from_str("Sale total out of range"))?;
    to_json(&totals)
}

/// Total of a purchase from a JSON array of line items
#[wasm_bindgen]
pub fn preview_purchase_total(items_json: &str) -> Result<String, JsValue> {
    let items: Vec<PurchaseItem> =
        serde_json::from_str(items_json).map_err(|e| js_error("Invalid items JSON", e))?;
    purchase_total(&items)
        .map(|total| total.to_string())
        .ok_or_else(|| JsValue::from_str("Purchase total out of range"))
}

#[wasm_bindgen]
pub fn validate_product_form(form_json: &str) -> Result<String, JsValue> {
    field_errors(form_json, ProductForm::parse)
}

#[wasm_bindgen]
pub fn validate_supplier_form(form_json: &str) -> Result<String, JsValue> {
    field_errors(form_json, SupplierForm::parse)
}

#[wasm_bindgen]
pub fn validate_customer_form(form_json: &str) -> Result<String, JsValue> {
    field_errors(form_json, CustomerForm::parse)
}

#[wasm_bindgen]
pub fn validate_expense_form(form_json: &str) -> Result<String, JsValue> {
    field_errors(form_json, ExpenseForm::parse)
}

#[wasm_bindgen]
pub fn validate_purchase_form(form_json: &str) -> Result<String, JsValue> {
    field_errors(form_json, PurchaseForm::parse)
}

/// Validate a sale form; `now_ms` fills in a missing sale date
#[wasm_bindgen]
pub fn validate_sale_form(form_json: &str, now_ms: f64) -> Result<String, JsValue> {
    let now = timestamp(now_ms)?;
    field_errors(form_json, |form: SaleForm| form.parse(now))
}

#[wasm_bindgen]
pub fn validate_payment_form(form_json: &str, now_ms: f64) -> Result<String, JsValue> {
    let now = timestamp(now_ms)?;
    field_errors(form_json, |form: PaymentForm| form.parse(now))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_MS: f64 = 1_735_689_600_000.0;

    #[test]
    fn test_preview_sale_totals() {
        let json = preview_sale_totals("150000", 5, "10").unwrap();
        let totals: SaleTotals = serde_json::from_str(&json).unwrap();
        assert_eq!(totals.subtotal, Decimal::from(750000));
        assert_eq!(totals.discount, Decimal::from(75000));
        assert_eq!(totals.final_total, Decimal::from(675000));
    }

    #[test]
    fn test_preview_purchase_total() {
        let items = r#"[
            {"product_id": 1, "quantity": 10, "unit_price": "120000"},
            {"product_id": 2, "quantity": 2, "unit_price": "135000"}
        ]"#;
        assert_eq!(preview_purchase_total(items).unwrap(), "1470000");
    }

    #[test]
    fn test_preview_sale_discount_in_cents() {
        let json = preview_sale_totals("1.00", 1, "0.5").unwrap();
        let totals: SaleTotals = serde_json::from_str(&json).unwrap();
        assert_eq!(totals.discount, Decimal::new(1, 2));
        assert_eq!(totals.final_total, Decimal::new(99, 2));
    }

    #[test]
    fn test_purchase_form_with_huge_price_is_rejected() {
        let form = r#"{"productId": "1", "supplierId": "1", "jumlah": "2",
                       "harga_beli": "79228162514264337593543950335",
                       "tanggal_pembelian": "2025-01-05", "status_pembayaran": "lunas"}"#;
        let errors: FieldErrors = serde_json::from_str(&validate_purchase_form(form).unwrap()).unwrap();
        assert_eq!(errors["harga_beli"], vec!["Nilai terlalu besar.".to_string()]);
    }

    #[test]
    fn test_valid_product_form_has_no_errors() {
        let form = r#"{"nama_barang": "Daging Sirloin", "stok": "50",
                       "harga_jual": "150000", "harga_beli_terakhir": "120000"}"#;
        assert_eq!(validate_product_form(form).unwrap(), "{}");
    }

    #[test]
    fn test_invalid_product_form_reports_fields() {
        let json = validate_product_form(r#"{"nama_barang": "Da", "stok": "-1"}"#).unwrap();
        let errors: FieldErrors = serde_json::from_str(&json).unwrap();
        assert!(errors.contains_key("nama_barang"));
        assert!(errors.contains_key("stok"));
        assert!(errors.contains_key("harga_jual"));
    }

    #[test]
    fn test_sale_form_discount_range() {
        let json = validate_sale_form(r#"{"productId": "1", "jumlah": "2", "discount": "150"}"#, NOW_MS)
            .unwrap();
        let errors: FieldErrors = serde_json::from_str(&json).unwrap();
        assert_eq!(errors["discount"], vec!["Discount harus antara 0 dan 100".to_string()]);
    }

    #[test]
    fn test_payment_form_requires_positive_amount() {
        let json = validate_payment_form(r#"{"jumlah_bayar": "0"}"#, NOW_MS).unwrap();
        let errors: FieldErrors = serde_json::from_str(&json).unwrap();
        assert!(errors.contains_key("jumlah_bayar"));
    }
}
