//! Receipt domain types.
//!
//! A receipt is the immutable record of one completed, gateway-verified
//! purchase. Its line items are frozen copies of the cart at verification
//! time - they never reference live product data, so later repricing or
//! deletion of a product cannot rewrite purchase history.

use chrono::{DateTime, Utc};
use grandeur_core::{OrderRef, ProductId, ReceiptId, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

/// A completed purchase record. Created exactly once per order reference,
/// never mutated afterward.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Receipt {
    /// Internal receipt ID.
    pub id: ReceiptId,
    /// The order reference minted at checkout initiation. Unique.
    pub order_ref: OrderRef,
    /// Purchasing user.
    pub user_id: UserId,
    /// Customer name at time of purchase.
    pub customer_name: String,
    /// Customer email at time of purchase.
    pub customer_email: String,
    /// Customer phone at time of purchase.
    pub customer_phone: Option<String>,
    /// Total amount as reported by the gateway.
    pub amount: Decimal,
    /// The gateway's transaction identifier.
    pub transaction_id: String,
    /// Observed terminal transaction status (e.g. "successful").
    pub status: String,
    /// When the receipt was materialized.
    pub created_at: DateTime<Utc>,
}

/// A frozen line item belonging to a receipt.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReceiptItem {
    /// Back-reference to the source product, for analytics only.
    pub product_id: ProductId,
    /// Product name at time of purchase.
    pub name: String,
    /// Unit price at time of purchase.
    pub unit_price: Decimal,
    /// Product image at time of purchase.
    pub image: Option<String>,
    /// Units purchased.
    pub quantity: i32,
    /// `unit_price * quantity`, computed at snapshot time.
    pub line_total: Decimal,
}

/// A receipt together with its line items, as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptBundle {
    /// The receipt header.
    #[serde(flatten)]
    pub receipt: Receipt,
    /// The frozen line items.
    pub items: Vec<ReceiptItem>,
}

/// Parameters for creating a receipt header.
#[derive(Debug, Clone)]
pub struct NewReceipt {
    pub order_ref: OrderRef,
    pub user_id: UserId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub amount: Decimal,
    pub transaction_id: String,
    pub status: String,
}

/// Parameters for one frozen line item.
#[derive(Debug, Clone)]
pub struct NewReceiptItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub image: Option<String>,
    pub quantity: i32,
    pub line_total: Decimal,
}
