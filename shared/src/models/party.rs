//! Supplier and customer models

use serde::{Deserialize, Serialize};

/// Values for creating or replacing a supplier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierInput {
    pub name: String,
    pub contact: Option<String>,
}

/// Values for creating or replacing a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub contact: Option<String>,
}
