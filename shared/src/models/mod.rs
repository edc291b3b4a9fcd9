//! Domain models for the Sapi Seto back office

mod expense;
mod party;
mod payment;
mod product;
mod purchase;
mod sale;
mod user;

pub use expense::*;
pub use party::*;
pub use payment::*;
pub use product::*;
pub use purchase::*;
pub use sale::*;
pub use user::*;

use crate::types::Id;

/// A product/quantity row belonging to a purchase or sale
pub trait LineItem {
    fn product_id(&self) -> Id;
    fn quantity(&self) -> i32;
}
