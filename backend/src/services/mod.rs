//! Business logic services for the Sapi Seto back office

pub mod auth;
pub mod customer;
pub mod expense;
pub mod ledger;
pub mod payment;
pub mod product;
pub mod purchase;
pub mod sale;
pub mod seed;
pub mod supplier;

pub use auth::{AuthService, SessionCodec};
pub use customer::CustomerService;
pub use expense::ExpenseService;
pub use payment::PaymentService;
pub use product::ProductService;
pub use purchase::PurchaseService;
pub use sale::SaleService;
pub use seed::SeedService;
pub use supplier::SupplierService;
