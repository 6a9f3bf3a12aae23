//! Product domain type.
//!
//! Products are owned by the catalog subsystem. The cart consults id,
//! name, price, and image; nothing here is mutated by this pipeline.

use grandeur_core::ProductId;
use rust_decimal::Decimal;
use serde::Serialize;

/// A catalog product (read-only reference).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in the store's currency.
    pub price: Decimal,
    /// Image URL, if one is set.
    pub image: Option<String>,
}
