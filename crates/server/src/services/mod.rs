//! Business logic for the cart-to-receipt pipeline.
//!
//! Services are thin coordinators: validation and sequencing live here,
//! atomicity lives in the repositories, and the wire representation of
//! failures lives in [`crate::error`].

pub mod cart;
pub mod checkout;

pub use cart::{AddItem, CartError, CartService, UpdateItem};
pub use checkout::{CheckoutError, CheckoutService, CheckoutSession, VerifiedReceipt};
