//! HTTP handlers for the Sapi Seto back office
//!
//! Mutations accept form-encoded bodies named after the back-office form
//! fields. A valid submission redirects to the entity's listing page; an
//! invalid one answers 422 with the field errors.

pub mod auth;
pub mod customer;
pub mod dashboard;
pub mod expense;
pub mod health;
pub mod payment;
pub mod product;
pub mod purchase;
pub mod sale;
pub mod supplier;

pub use auth::*;
pub use customer::*;
pub use dashboard::*;
pub use expense::*;
pub use health::*;
pub use payment::*;
pub use product::*;
pub use purchase::*;
pub use sale::*;
pub use supplier::*;

use axum::response::Redirect;
use shared::types::{parse_id, Id};

use crate::error::AppResult;

/// Parse an identifier taken from the request path
pub(crate) fn path_id(raw: &str) -> AppResult<Id> {
    Ok(parse_id(raw)?)
}

/// Where the browser goes after a successful form submission
pub(crate) fn back_to(entity: &str) -> Redirect {
    Redirect::to(&format!("/dashboard/{}", entity))
}
