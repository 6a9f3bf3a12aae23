//! Checkout orchestrator.
//!
//! Initiation reads a cart snapshot, computes the total, mints an order
//! reference, and asks the gateway for a payment link. Verification takes
//! the gateway's authoritative answer and materializes the receipt - at
//! most once per order reference, however many times the gateway retries
//! the callback.

use grandeur_core::{Email, OrderRef, UserId, order_total};
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::config::PaymentsConfig;
use crate::db::{CartRepository, ReceiptRepository, RepositoryError, UserRepository};
use crate::models::{CartLine, NewReceipt, NewReceiptItem, ReceiptBundle, User};
use crate::payments::{
    CustomerInfo, GatewayError, InitiatePaymentRequest, PaymentGateway, PaymentMeta,
};

/// Errors from checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user does not resolve (by email at initiation, by the
    /// round-tripped id at verification).
    #[error("user {0} does not exist")]
    UserNotFound(String),

    /// The user has no cart, or it is empty.
    #[error("cart does not exist for user {0}")]
    CartNotFound(UserId),

    /// Verification called without a transaction id.
    #[error("transaction id is missing")]
    MissingTransactionId,

    /// The gateway answered, but the transaction did not reach the
    /// terminal success state. Distinct from a gateway failure; the
    /// observed status is surfaced to the caller.
    #[error("payment not successful (status: {status})")]
    PaymentNotSuccessful {
        /// The status the gateway reported.
        status: String,
    },

    /// The gateway was unreachable, rejected the call, or returned an
    /// undecodable response.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of a successful initiation: where to send the customer, and the
/// reference that will come back through the gateway's metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
    /// Hosted payment page for the customer.
    pub payment_link: String,
    /// The order reference minted for this checkout.
    pub order_ref: OrderRef,
}

/// Result of a successful verification.
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedReceipt {
    /// The receipt with its frozen line items.
    #[serde(flatten)]
    pub bundle: ReceiptBundle,
    /// False when the receipt already existed (an idempotent replay).
    pub newly_created: bool,
}

/// Freeze cart lines into receipt line-item snapshots.
#[must_use]
pub fn snapshot_items(lines: &[CartLine]) -> Vec<NewReceiptItem> {
    lines
        .iter()
        .map(|line| NewReceiptItem {
            product_id: line.product.id,
            name: line.product.name.clone(),
            unit_price: line.product.price,
            image: line.product.image.clone(),
            quantity: line.quantity,
            line_total: line.line_total(),
        })
        .collect()
}

/// Orchestrates checkout initiation and verification against a payment
/// gateway.
pub struct CheckoutService<'a, G> {
    pool: &'a PgPool,
    gateway: &'a G,
    payments: &'a PaymentsConfig,
}

impl<'a, G: PaymentGateway> CheckoutService<'a, G> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, gateway: &'a G, payments: &'a PaymentsConfig) -> Self {
        Self {
            pool,
            gateway,
            payments,
        }
    }

    /// Start a checkout: compute the cart total, mint an order reference,
    /// and request a payment link from the gateway.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the email does not resolve
    /// - `CartNotFound` if the user has no cart or it is empty
    /// - `Gateway` if the gateway rejects the request or is unreachable
    pub async fn initiate(&self, email: &Email) -> Result<CheckoutSession, CheckoutError> {
        let user = UserRepository::new(self.pool)
            .get_by_email(email)
            .await?
            .ok_or_else(|| CheckoutError::UserNotFound(email.to_string()))?;

        let carts = CartRepository::new(self.pool);
        let cart = carts
            .find_by_user(user.id)
            .await?
            .ok_or(CheckoutError::CartNotFound(user.id))?;

        let items = carts.items_with_products(cart.id).await?;
        if items.is_empty() {
            return Err(CheckoutError::CartNotFound(user.id));
        }

        let total = order_total(items.iter().map(|line| (line.product.price, line.quantity)));
        let order_ref = OrderRef::generate();

        let request = InitiatePaymentRequest {
            order_ref,
            amount: total,
            currency: self.payments.currency,
            redirect_url: self.payments.redirect_url.clone(),
            customer: CustomerInfo {
                name: user.full_name(),
                email: user.email.to_string(),
                phone: user.phone.clone(),
            },
            // Round-trips through the gateway; verification recovers the
            // user and order from it.
            meta: PaymentMeta {
                user_id: user.id,
                order_ref,
            },
        };

        let payment_link = self.gateway.initiate(&request).await?;

        tracing::info!(user_id = %user.id, %order_ref, %total, "payment initiated");

        Ok(CheckoutSession {
            payment_link,
            order_ref,
        })
    }

    /// Verify a transaction and materialize its receipt exactly once.
    ///
    /// A repeat call for an already-verified order returns the existing
    /// receipt with `newly_created = false` - the gateway may retry the
    /// callback, and a replay must never create a second receipt.
    ///
    /// # Errors
    ///
    /// - `MissingTransactionId` for an empty transaction id
    /// - `Gateway` if the verify call fails or its metadata is invalid
    /// - `PaymentNotSuccessful` if the transaction is not in the terminal
    ///   success state
    /// - `UserNotFound` / `CartNotFound` if the round-tripped ids do not
    ///   resolve
    pub async fn verify(&self, transaction_id: &str) -> Result<VerifiedReceipt, CheckoutError> {
        if transaction_id.trim().is_empty() {
            return Err(CheckoutError::MissingTransactionId);
        }

        let transaction = self.gateway.verify(transaction_id).await?;

        if !transaction.is_successful() {
            return Err(CheckoutError::PaymentNotSuccessful {
                status: transaction.status,
            });
        }

        let PaymentMeta { user_id, order_ref } = transaction.meta;

        let user = UserRepository::new(self.pool)
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| CheckoutError::UserNotFound(user_id.to_string()))?;

        let receipts = ReceiptRepository::new(self.pool);

        // Replay check first: once a receipt exists, the state of the cart
        // is irrelevant.
        if let Some(existing) = receipts.find_by_order_ref(order_ref).await? {
            tracing::info!(%order_ref, "payment already verified");
            return Ok(VerifiedReceipt {
                bundle: existing,
                newly_created: false,
            });
        }

        let carts = CartRepository::new(self.pool);
        let cart = carts
            .find_by_user(user.id)
            .await?
            .ok_or(CheckoutError::CartNotFound(user.id))?;

        let items = carts.items_with_products(cart.id).await?;
        if items.is_empty() {
            return Err(CheckoutError::CartNotFound(user.id));
        }

        let new_receipt = build_receipt(&user, order_ref, transaction_id, &transaction);
        let new_items = snapshot_items(&items);

        match receipts.create_with_items(&new_receipt, &new_items).await {
            Ok(bundle) => {
                tracing::info!(%order_ref, receipt_id = %bundle.receipt.id, "receipt created");
                Ok(VerifiedReceipt {
                    bundle,
                    newly_created: true,
                })
            }
            // A concurrent verification inserted first; its receipt is the
            // one true record for this order.
            Err(RepositoryError::Conflict(_)) => {
                let existing = receipts
                    .find_by_order_ref(order_ref)
                    .await?
                    .ok_or(CheckoutError::Repository(RepositoryError::NotFound))?;
                tracing::info!(%order_ref, "lost receipt insert race, returning existing");
                Ok(VerifiedReceipt {
                    bundle: existing,
                    newly_created: false,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn build_receipt(
    user: &User,
    order_ref: OrderRef,
    transaction_id: &str,
    transaction: &crate::payments::VerifiedTransaction,
) -> NewReceipt {
    NewReceipt {
        order_ref,
        user_id: user.id,
        customer_name: user.full_name(),
        customer_email: user.email.to_string(),
        customer_phone: user.phone.clone(),
        amount: transaction.amount,
        transaction_id: transaction_id.to_owned(),
        status: transaction.status.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::Product;
    use grandeur_core::ProductId;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn line(id: i32, price: &str, quantity: i32) -> CartLine {
        CartLine {
            product: Product {
                id: ProductId::new(id),
                name: format!("product-{id}"),
                price: Decimal::from_str(price).unwrap(),
                image: Some(format!("https://img.grandeur.shop/{id}.jpg")),
            },
            quantity,
            selected_size: None,
            selected_color: None,
        }
    }

    #[test]
    fn test_snapshot_preserves_line_totals() {
        let lines = [line(1, "10.00", 2), line(2, "5.50", 3)];
        let snapshots = snapshot_items(&lines);

        assert_eq!(snapshots.len(), 2);
        assert_eq!(
            snapshots.first().unwrap().line_total,
            Decimal::from_str("20.00").unwrap()
        );
        assert_eq!(
            snapshots.get(1).unwrap().line_total,
            Decimal::from_str("16.50").unwrap()
        );

        let combined: Decimal = snapshots.iter().map(|s| s.line_total).sum();
        assert_eq!(combined, Decimal::from_str("36.50").unwrap());
    }

    #[test]
    fn test_snapshot_copies_product_fields() {
        let lines = [line(9, "1.00", 1)];
        let snapshots = snapshot_items(&lines);
        let snapshot = snapshots.first().unwrap();

        assert_eq!(snapshot.product_id, ProductId::new(9));
        assert_eq!(snapshot.name, "product-9");
        assert_eq!(snapshot.unit_price, Decimal::from_str("1.00").unwrap());
        assert_eq!(
            snapshot.image.as_deref(),
            Some("https://img.grandeur.shop/9.jpg")
        );
    }

    #[test]
    fn test_snapshot_empty_cart() {
        assert!(snapshot_items(&[]).is_empty());
    }
}
