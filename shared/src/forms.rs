//! Form bodies posted by the back-office pages
//!
//! Field names follow the HTML forms (`nama_barang`, `productId`, ...). Each
//! form parses into a typed input from [`crate::models`] or returns every
//! field error it found.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    CustomerInput, ExpenseInput, NewPurchase, PaymentInput, ProductInput, PurchaseChanges,
    PurchaseItem, SaleRequest, SupplierInput,
};
use crate::types::{parse_id, FieldErrors, Id, PaymentStatus};
use crate::validation::{
    coerce_decimal, coerce_int, coerce_money, merge_errors, non_blank, parse_form_date,
    push_error, require_at_least, require_positive, require_present, to_field_errors, MAX_MONEY,
};

fn check<V: Validate>(form: &V, errors: &mut FieldErrors) {
    if let Err(e) = form.validate() {
        merge_errors(errors, to_field_errors(&e));
    }
}

fn finish<T>(errors: FieldErrors, build: impl FnOnce() -> T) -> Result<T, FieldErrors> {
    if errors.is_empty() {
        Ok(build())
    } else {
        Err(errors)
    }
}

/// Identifier field that must be present and well formed
fn required_id(raw: Option<&str>, field: &str, missing: &str, errors: &mut FieldErrors) -> Option<Id> {
    let value = require_present(raw, field, missing, errors)?;
    match parse_id(&value) {
        Ok(id) => Some(id),
        Err(e) => {
            push_error(errors, field, format!("ID tidak valid: {}", e));
            None
        }
    }
}

fn payment_status(raw: Option<&str>, default: Option<PaymentStatus>, errors: &mut FieldErrors) -> Option<PaymentStatus> {
    match (non_blank(raw), default) {
        (None, Some(status)) => Some(status),
        (None, None) => {
            push_error(errors, "status_pembayaran", "Required");
            None
        }
        (Some(value), _) => match value.parse() {
            Ok(status) => Some(status),
            Err(_) => {
                push_error(
                    errors,
                    "status_pembayaran",
                    format!(
                        "Invalid enum value. Expected 'lunas' | 'belum_lunas', received '{}'",
                        value
                    ),
                );
                None
            }
        },
    }
}

// ============================================================================
// Products, suppliers, customers
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProductForm {
    #[serde(default)]
    #[validate(length(min = 3, message = "Nama barang minimal 3 karakter"))]
    pub nama_barang: String,
    pub stok: Option<String>,
    pub harga_jual: Option<String>,
    pub harga_beli_terakhir: Option<String>,
}

impl ProductForm {
    pub fn parse(self) -> Result<ProductInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        check(&self, &mut errors);

        let stock = coerce_int(self.stok.as_deref(), "stok", &mut errors);
        if matches!(stock, Some(s) if s < 0) {
            push_error(&mut errors, "stok", "Stok tidak boleh negatif");
        }
        let selling_price = require_positive(
            coerce_money(self.harga_jual.as_deref(), "harga_jual", &mut errors),
            "harga_jual",
            "Harga jual harus lebih dari 0",
            &mut errors,
        );
        let last_purchase_price = require_positive(
            coerce_money(self.harga_beli_terakhir.as_deref(), "harga_beli_terakhir", &mut errors),
            "harga_beli_terakhir",
            "Harga beli harus lebih dari 0",
            &mut errors,
        );

        finish(errors, || ProductInput {
            name: self.nama_barang.trim().to_string(),
            stock: stock.unwrap_or_default(),
            selling_price: selling_price.unwrap_or_default(),
            last_purchase_price: last_purchase_price.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SupplierForm {
    #[serde(default)]
    #[validate(length(min = 3, message = "Nama supplier minimal 3 karakter"))]
    pub nama_supplier: String,
    #[validate(length(max = 100, message = "Kontak maksimal 100 karakter"))]
    pub kontak: Option<String>,
}

impl SupplierForm {
    pub fn parse(self) -> Result<SupplierInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        check(&self, &mut errors);
        finish(errors, || SupplierInput {
            name: self.nama_supplier.trim().to_string(),
            contact: non_blank(self.kontak.as_deref()),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CustomerForm {
    #[serde(default)]
    #[validate(length(min = 3, message = "Nama pelanggan minimal harus 3 karakter."))]
    pub nama_pelanggan: String,
    pub kontak: Option<String>,
}

impl CustomerForm {
    pub fn parse(self) -> Result<CustomerInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        check(&self, &mut errors);

        // Contact may be left empty; when filled it must look like a phone number
        let contact = non_blank(self.kontak.as_deref());
        if matches!(&contact, Some(c) if c.chars().count() < 8) {
            push_error(&mut errors, "kontak", "Kontak minimal 8 karakter jika diisi.");
        }

        finish(errors, || CustomerInput {
            name: self.nama_pelanggan.trim().to_string(),
            contact,
        })
    }
}

// ============================================================================
// Expenses
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ExpenseForm {
    pub tanggal_pengeluaran: Option<String>,
    #[serde(default)]
    #[validate(length(min = 3, message = "Jenis pengeluaran minimal 3 karakter."))]
    pub jenis_pengeluaran: String,
    pub nominal: Option<String>,
    pub keterangan: Option<String>,
}

impl ExpenseForm {
    pub fn parse(self) -> Result<ExpenseInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        check(&self, &mut errors);

        let expense_date = self.tanggal_pengeluaran.as_deref().and_then(parse_form_date);
        if expense_date.is_none() {
            push_error(&mut errors, "tanggal_pengeluaran", "Tanggal pengeluaran harus diisi.");
        }
        let amount = require_positive(
            coerce_money(self.nominal.as_deref(), "nominal", &mut errors),
            "nominal",
            "Nominal harus lebih besar dari 0.",
            &mut errors,
        );

        finish(errors, || ExpenseInput {
            expense_date: expense_date.unwrap_or_default(),
            category: self.jenis_pengeluaran.trim().to_string(),
            amount: amount.unwrap_or_default(),
            description: non_blank(self.keterangan.as_deref()),
        })
    }
}

// ============================================================================
// Purchases
// ============================================================================

/// Quantity and unit price shared by the purchase forms
fn purchase_line(
    product_id: Option<&str>,
    jumlah: Option<&str>,
    harga_beli: Option<&str>,
    errors: &mut FieldErrors,
) -> Option<PurchaseItem> {
    let product_id = required_id(product_id, "productId", "Produk harus dipilih.", errors);
    let quantity = coerce_int(jumlah, "jumlah", errors);
    if matches!(quantity, Some(q) if q < 1) {
        push_error(errors, "jumlah", "Jumlah minimal 1.");
    }
    let unit_price = require_at_least(
        coerce_money(harga_beli, "harga_beli", errors),
        Decimal::ONE,
        "harga_beli",
        "Harga beli tidak boleh kosong.",
        errors,
    );
    if let (Some(q), Some(p)) = (quantity, unit_price) {
        let line_total = Decimal::from(q).checked_mul(p);
        if line_total.map_or(true, |total| total > MAX_MONEY) {
            push_error(errors, "jumlah", "Total pembelian terlalu besar.");
            return None;
        }
    }

    Some(PurchaseItem {
        product_id: product_id?,
        quantity: quantity?,
        unit_price: unit_price?,
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseForm {
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
    #[serde(rename = "supplierId")]
    pub supplier_id: Option<String>,
    pub jumlah: Option<String>,
    pub harga_beli: Option<String>,
    pub tanggal_pembelian: Option<String>,
    pub status_pembayaran: Option<String>,
    pub note: Option<String>,
}

impl PurchaseForm {
    pub fn parse(self) -> Result<NewPurchase, FieldErrors> {
        let mut errors = FieldErrors::new();

        let item = purchase_line(
            self.product_id.as_deref(),
            self.jumlah.as_deref(),
            self.harga_beli.as_deref(),
            &mut errors,
        );
        let supplier_id = required_id(
            self.supplier_id.as_deref(),
            "supplierId",
            "Supplier harus dipilih.",
            &mut errors,
        );
        let purchase_date = self.tanggal_pembelian.as_deref().and_then(parse_form_date);
        if purchase_date.is_none() {
            push_error(&mut errors, "tanggal_pembelian", "Tanggal pembelian tidak valid.");
        }
        let status = payment_status(self.status_pembayaran.as_deref(), None, &mut errors);

        finish(errors, || NewPurchase {
            supplier_id: supplier_id.unwrap_or_default(),
            purchase_date,
            payment_status: status.unwrap_or_default(),
            note: non_blank(self.note.as_deref()),
            items: item.into_iter().collect(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseUpdateForm {
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
    #[serde(rename = "supplierId")]
    pub supplier_id: Option<String>,
    pub jumlah: Option<String>,
    pub harga_beli: Option<String>,
}

impl PurchaseUpdateForm {
    pub fn parse(self) -> Result<PurchaseChanges, FieldErrors> {
        let mut errors = FieldErrors::new();

        let item = purchase_line(
            self.product_id.as_deref(),
            self.jumlah.as_deref(),
            self.harga_beli.as_deref(),
            &mut errors,
        );
        let supplier_id = required_id(
            self.supplier_id.as_deref(),
            "supplierId",
            "Supplier harus dipilih.",
            &mut errors,
        );

        finish(errors, || PurchaseChanges {
            supplier_id: supplier_id.unwrap_or_default(),
            items: item.into_iter().collect(),
        })
    }
}

// ============================================================================
// Sales
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleForm {
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    pub jumlah: Option<String>,
    /// Discount in percent
    pub discount: Option<String>,
    pub tanggal_penjualan: Option<String>,
    pub status_pembayaran: Option<String>,
    pub note: Option<String>,
}

impl SaleForm {
    /// Parse the form; a missing or unreadable sale date becomes `now`
    pub fn parse(self, now: DateTime<Utc>) -> Result<SaleRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let product_id = required_id(
            self.product_id.as_deref(),
            "productId",
            "Product harus dipilih",
            &mut errors,
        );

        let quantity = match non_blank(self.jumlah.as_deref()) {
            None => {
                push_error(&mut errors, "jumlah", "Jumlah tidak valid");
                None
            }
            Some(raw) => match raw.parse::<i32>() {
                Ok(q) if q >= 1 => Some(q),
                _ => {
                    push_error(&mut errors, "jumlah", "Jumlah tidak valid");
                    None
                }
            },
        };

        let discount_percent = coerce_decimal(self.discount.as_deref(), "discount", &mut errors);
        if matches!(discount_percent, Some(d) if d < Decimal::ZERO || d > Decimal::ONE_HUNDRED) {
            push_error(&mut errors, "discount", "Discount harus antara 0 dan 100");
        }

        let customer_id = match non_blank(self.customer_id.as_deref()) {
            None => None,
            Some(raw) => match parse_id(&raw) {
                Ok(id) => Some(id),
                Err(e) => {
                    push_error(&mut errors, "customerId", format!("ID tidak valid: {}", e));
                    None
                }
            },
        };

        let status = payment_status(
            self.status_pembayaran.as_deref(),
            Some(PaymentStatus::Unpaid),
            &mut errors,
        );
        let sale_date = self
            .tanggal_penjualan
            .as_deref()
            .and_then(parse_form_date)
            .unwrap_or(now);

        finish(errors, || SaleRequest {
            product_id: product_id.unwrap_or_default(),
            quantity: quantity.unwrap_or_default(),
            discount_percent: discount_percent.unwrap_or_default(),
            customer_id,
            sale_date: Some(sale_date),
            payment_status: status.unwrap_or_default(),
            note: non_blank(self.note.as_deref()),
        })
    }
}

// ============================================================================
// Payments and login
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentForm {
    pub tanggal_bayar: Option<String>,
    pub jumlah_bayar: Option<String>,
}

impl PaymentForm {
    pub fn parse(self, now: DateTime<Utc>) -> Result<PaymentInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let payment_date = match non_blank(self.tanggal_bayar.as_deref()) {
            None => Some(now),
            Some(raw) => {
                let parsed = parse_form_date(&raw);
                if parsed.is_none() {
                    push_error(&mut errors, "tanggal_bayar", "Tanggal bayar tidak valid.");
                }
                parsed
            }
        };
        let amount = require_positive(
            coerce_money(self.jumlah_bayar.as_deref(), "jumlah_bayar", &mut errors),
            "jumlah_bayar",
            "Jumlah bayar harus lebih dari 0.",
            &mut errors,
        );

        finish(errors, || PaymentInput {
            payment_date: payment_date.unwrap_or(now),
            amount: amount.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username harus diisi"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password harus diisi"))]
    pub password: String,
}

impl LoginForm {
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check(self, &mut errors);
        finish(errors, || ())
    }
}
