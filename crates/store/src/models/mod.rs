//! Domain models for the store.

pub mod cart;
pub mod product;
pub mod transaction;
pub mod user;

pub use cart::{CartLine, CartView, PricedCartLine};
pub use product::{NewProduct, Product, ProductChanges};
pub use transaction::TransactionRecord;
pub use user::{CurrentUser, User, session_keys};
