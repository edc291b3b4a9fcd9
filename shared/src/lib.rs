//! Shared types and models for the Sapi Seto back office
//!
//! This crate contains the inventory ledger arithmetic, form parsing and
//! models used by the backend and by the browser (via WASM).

pub mod forms;
pub mod ledger;
pub mod models;
pub mod types;
pub mod validation;

pub use forms::*;
pub use ledger::*;
pub use models::*;
pub use types::*;
pub use validation::*;
