//! Business logic services.
//!
//! # Services
//!
//! - `account` - Registration, login, password change, profile edits
//! - `catalog` - Product CRUD and the admin user-management operations
//! - `checkout` - The cart and checkout engine
//! - `media` - Thin file-I/O helper for product images
//!
//! Every operation takes explicit identifiers; nothing in here reads
//! ambient session state.

pub mod account;
pub mod catalog;
pub mod checkout;
pub mod media;

pub use account::{AccountError, AccountService};
pub use catalog::{CatalogError, CatalogService};
pub use checkout::{CheckoutError, CheckoutService};
