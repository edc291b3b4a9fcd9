//! Database models for the Sapi Seto back office
//!
//! Re-exports input models from the shared crate alongside the row types
//! the services read back

pub use shared::models::*;

pub use crate::services::customer::Customer;
pub use crate::services::expense::Expense;
pub use crate::services::payment::{Payment, PaymentSummary};
pub use crate::services::product::Product;
pub use crate::services::purchase::{Purchase, PurchaseDetail, PurchaseWithItems};
pub use crate::services::sale::{Sale, SaleDetail, SaleWithItems};
pub use crate::services::supplier::Supplier;
