//! HTTP route handlers for the store API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Readiness check (verifies database)
//!
//! # Cart
//! POST   /cart                   - Add item (201 + cart)
//! PATCH  /cart                   - Partial line-item update (200 + cart)
//! DELETE /cart                   - Remove one unit (200 + cart)
//! GET    /cart/{user_id}         - Fetch cart (200 + cart)
//!
//! # Checkout
//! POST   /checkout/initiate      - Request a payment link (201)
//! POST   /checkout/verify        - Verify a transaction (200, idempotent)
//! ```
//!
//! All bodies and responses use the JSON envelope
//! `{success, message, data}`.

pub mod cart;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// The JSON response envelope every endpoint uses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable outcome message.
    pub message: String,
    /// Payload, absent on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// A success envelope with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// A failure envelope.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(cart::add_item)
                .patch(cart::update_item)
                .delete(cart::remove_item),
        )
        .route("/{user_id}", get(cart::get_cart))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/initiate", post(checkout::initiate))
        .route("/verify", post(checkout::verify))
}

/// Create all routes for the store API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}
