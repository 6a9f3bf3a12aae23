//! Integration tests for the payment gateway seam.
//!
//! A scripted gateway stands in for Flutterwave to verify the contract
//! the orchestrator relies on: metadata round-trips unchanged, repeated
//! verify calls answer identically, and only the terminal "successful"
//! status counts as a completed payment.

use grandeur_core::{OrderRef, UserId};
use grandeur_server::payments::{
    GatewayError, InitiatePaymentRequest, PaymentGateway, PaymentMeta, VerifiedTransaction,
};
use rust_decimal::Decimal;
use std::str::FromStr;

/// A gateway that returns a fixed link and replays one scripted
/// transaction outcome for every verify call.
struct ScriptedGateway {
    status: &'static str,
    amount: Decimal,
    meta: PaymentMeta,
}

impl PaymentGateway for ScriptedGateway {
    async fn initiate(&self, request: &InitiatePaymentRequest) -> Result<String, GatewayError> {
        Ok(format!(
            "https://checkout.example.com/pay/{}",
            request.order_ref
        ))
    }

    async fn verify(&self, _transaction_id: &str) -> Result<VerifiedTransaction, GatewayError> {
        Ok(VerifiedTransaction {
            status: self.status.to_owned(),
            amount: self.amount,
            currency: "NGN".to_owned(),
            meta: self.meta,
        })
    }
}

fn scripted(status: &'static str) -> (ScriptedGateway, PaymentMeta) {
    let meta = PaymentMeta {
        user_id: UserId::new(4),
        order_ref: OrderRef::generate(),
    };
    let gateway = ScriptedGateway {
        status,
        amount: Decimal::from_str("36.50").unwrap(),
        meta,
    };
    (gateway, meta)
}

#[tokio::test]
async fn test_metadata_round_trips_through_the_gateway() {
    let (gateway, meta) = scripted("successful");

    // The metadata sent at initiation is the only way verification can
    // recover the user and order.
    let verified = gateway.verify("tx-1").await.unwrap();
    assert_eq!(verified.meta, meta);
}

#[tokio::test]
async fn test_repeated_verify_answers_identically() {
    let (gateway, _) = scripted("successful");

    let first = gateway.verify("tx-1").await.unwrap();
    let second = gateway.verify("tx-1").await.unwrap();

    assert_eq!(first.status, second.status);
    assert_eq!(first.amount, second.amount);
    assert_eq!(first.meta, second.meta);
}

#[tokio::test]
async fn test_only_terminal_successful_counts() {
    for (status, expected) in [
        ("successful", true),
        ("pending", false),
        ("failed", false),
        ("cancelled", false),
    ] {
        let (gateway, _) = scripted(status);
        let verified = gateway.verify("tx-1").await.unwrap();
        assert_eq!(
            verified.is_successful(),
            expected,
            "status {status:?} misclassified"
        );
    }
}

#[tokio::test]
async fn test_payment_link_derives_from_order_ref() {
    let (gateway, meta) = scripted("successful");

    let request = InitiatePaymentRequest {
        order_ref: meta.order_ref,
        amount: Decimal::from_str("36.50").unwrap(),
        currency: grandeur_core::Currency::NGN,
        redirect_url: "https://grandeur.shop/thankyou".to_owned(),
        customer: grandeur_server::payments::CustomerInfo {
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            phone: None,
        },
        meta,
    };

    let link = gateway.initiate(&request).await.unwrap();
    assert!(link.contains(&meta.order_ref.to_string()));
}
