//! Payment gateway integration.
//!
//! The checkout orchestrator depends on the [`PaymentGateway`] trait, an
//! opaque capability with two operations: initiate a payment and verify a
//! transaction. The production implementation is [`FlutterwaveClient`];
//! tests substitute their own.
//!
//! Both operations may be slow, may fail independently of application
//! logic, and verify may be called more than once for the same
//! transaction - nothing in this module assumes otherwise.

mod flutterwave;

pub use flutterwave::FlutterwaveClient;

use grandeur_core::{Currency, OrderRef, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The gateway's terminal success status for a transaction.
pub const SUCCESSFUL_STATUS: &str = "successful";

/// Errors from payment gateway operations.
///
/// `Http` means the gateway could not be reached (including timeouts);
/// `Rejected` means it answered with a non-success envelope. The two are
/// distinct so the boundary can report them differently.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure or timeout - the gateway was unreachable.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered but rejected the request.
    #[error("gateway rejected request ({http_status}): {message}")]
    Rejected {
        /// HTTP status of the response.
        http_status: u16,
        /// The gateway's own message, surfaced to the caller.
        message: String,
    },

    /// The gateway's response could not be parsed.
    #[error("invalid gateway response: {0}")]
    Parse(String),

    /// The verified transaction's metadata was missing or malformed, so
    /// the callback cannot be correlated to a user and order.
    #[error("invalid transaction metadata: {0}")]
    InvalidMetadata(String),
}

/// Metadata embedded in the payment at initiation and round-tripped back
/// by the gateway at verification. This is the only channel correlating a
/// callback to a user and order, so the wire keys are load-bearing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentMeta {
    /// The purchasing user.
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// The order reference minted at initiation.
    #[serde(rename = "order_id")]
    pub order_ref: OrderRef,
}

/// Customer contact fields sent with a payment initiation.
#[derive(Debug, Clone)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// A payment-initiation request.
#[derive(Debug, Clone)]
pub struct InitiatePaymentRequest {
    /// Order reference, used as the gateway's transaction reference.
    pub order_ref: OrderRef,
    /// Order total.
    pub amount: Decimal,
    /// Settlement currency.
    pub currency: Currency,
    /// Where the gateway sends the customer after payment.
    pub redirect_url: String,
    /// Customer contact snapshot.
    pub customer: CustomerInfo,
    /// Correlation metadata, round-tripped through the gateway.
    pub meta: PaymentMeta,
}

/// The authoritative outcome of a transaction, as reported by the gateway.
#[derive(Debug, Clone)]
pub struct VerifiedTransaction {
    /// The transaction's status string. Terminal success is
    /// [`SUCCESSFUL_STATUS`]; anything else (pending, failed, cancelled)
    /// is not a completed payment.
    pub status: String,
    /// Amount the gateway settled.
    pub amount: Decimal,
    /// Currency the gateway settled in.
    pub currency: String,
    /// The metadata supplied at initiation.
    pub meta: PaymentMeta,
}

impl VerifiedTransaction {
    /// Whether the underlying payment reached the terminal success state.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.status == SUCCESSFUL_STATUS
    }
}

/// An external payment-processing service.
pub trait PaymentGateway {
    /// Request a payment link for the given order.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the gateway is unreachable or rejects the
    /// request.
    fn initiate(
        &self,
        request: &InitiatePaymentRequest,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;

    /// Fetch the authoritative outcome of a transaction.
    ///
    /// May be called more than once for the same transaction id; the
    /// gateway's answer is treated as idempotent.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the gateway is unreachable, rejects the
    /// call, or returns a response whose metadata cannot be decoded.
    fn verify(
        &self,
        transaction_id: &str,
    ) -> impl Future<Output = Result<VerifiedTransaction, GatewayError>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_status_classification() {
        let mut tx = VerifiedTransaction {
            status: "successful".to_owned(),
            amount: Decimal::ZERO,
            currency: "NGN".to_owned(),
            meta: PaymentMeta {
                user_id: UserId::new(1),
                order_ref: OrderRef::generate(),
            },
        };
        assert!(tx.is_successful());

        for status in ["pending", "failed", "cancelled", "SUCCESSFUL", ""] {
            tx.status = status.to_owned();
            assert!(!tx.is_successful(), "{status:?} must not count as success");
        }
    }

    #[test]
    fn test_payment_meta_wire_keys() {
        let meta = PaymentMeta {
            user_id: UserId::new(7),
            order_ref: OrderRef::generate(),
        };
        let json = serde_json::to_value(meta).unwrap();

        // The gateway round-trips these keys verbatim; renaming them breaks
        // verification of in-flight payments.
        assert_eq!(json["userId"], 7);
        assert_eq!(json["order_id"], meta.order_ref.to_string());
    }

    #[test]
    fn test_payment_meta_roundtrip() {
        let meta = PaymentMeta {
            user_id: UserId::new(42),
            order_ref: OrderRef::generate(),
        };
        let json = serde_json::to_string(&meta).unwrap();
        let back: PaymentMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
