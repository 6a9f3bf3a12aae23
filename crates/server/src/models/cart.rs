//! Cart domain types.
//!
//! A user has at most one cart; a product appears at most once per cart.
//! Both invariants are enforced by the storage layer, so these types never
//! have to model duplicates.

use grandeur_core::{CartId, UserId, line_total};
use rust_decimal::Decimal;
use serde::Serialize;

use super::Product;

/// A user's cart header.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning user. Unique - a user has at most one cart.
    pub user_id: UserId,
}

/// One line item in a cart, with its product resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    /// The product this line refers to.
    pub product: Product,
    /// Units of the product in the cart. Always positive.
    pub quantity: i32,
    /// Selected size variant, if any.
    pub selected_size: Option<String>,
    /// Selected color variant, if any.
    pub selected_color: Option<String>,
}

impl CartLine {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        line_total(self.product.price, self.quantity)
    }
}

/// The full cart as returned to callers: header plus resolved line items.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    /// Cart ID.
    pub id: CartId,
    /// Owning user.
    pub user_id: UserId,
    /// All line items with resolved product data.
    pub items: Vec<CartLine>,
}

impl CartView {
    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartLine::line_total).sum()
    }
}
