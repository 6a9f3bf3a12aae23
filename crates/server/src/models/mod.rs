//! Domain types for the cart-to-receipt pipeline.
//!
//! These are validated domain objects, separate from the raw row types the
//! repositories read. Everything serializable here is part of the JSON
//! response surface.

pub mod cart;
pub mod product;
pub mod receipt;
pub mod user;

pub use cart::{Cart, CartLine, CartView};
pub use product::Product;
pub use receipt::{NewReceipt, NewReceiptItem, Receipt, ReceiptBundle, ReceiptItem};
pub use user::User;
