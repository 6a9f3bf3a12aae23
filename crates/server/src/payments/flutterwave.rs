//! Flutterwave API client.
//!
//! Implements [`PaymentGateway`] against the Flutterwave v3 REST API:
//! `POST /payments` to obtain a hosted payment link and
//! `GET /transactions/{id}/verify` for the authoritative outcome.
//!
//! Every response arrives in an envelope `{status, message, data}`; an
//! envelope whose `status` is not `"success"` is a gateway rejection even
//! when the HTTP status is 2xx.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::PaymentsConfig;

use super::{GatewayError, InitiatePaymentRequest, PaymentGateway, PaymentMeta, VerifiedTransaction};

/// Hosted-payment-page branding sent with every initiation.
const PAYMENT_TITLE: &str = "Grandeur";
const PAYMENT_DESCRIPTION: &str = "Payment for items in cart";

/// Flutterwave API client.
#[derive(Clone)]
pub struct FlutterwaveClient {
    client: reqwest::Client,
    base_url: String,
}

impl FlutterwaveClient {
    /// Create a new Flutterwave client.
    ///
    /// The underlying HTTP client carries the bearer credential and a
    /// request timeout; an expired timeout surfaces as `GatewayError::Http`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the secret key
    /// is not a valid header value.
    pub fn new(config: &PaymentsConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| GatewayError::Parse(format!("invalid secret key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

impl PaymentGateway for FlutterwaveClient {
    #[instrument(skip(self, request), fields(order_ref = %request.order_ref))]
    async fn initiate(&self, request: &InitiatePaymentRequest) -> Result<String, GatewayError> {
        let url = format!("{}/payments", self.base_url);

        let payload = PaymentPayload {
            tx_ref: request.order_ref.to_string(),
            amount: request.amount,
            currency: request.currency.code(),
            redirect_url: &request.redirect_url,
            customer: CustomerPayload {
                email: &request.customer.email,
                name: &request.customer.name,
                phonenumber: request.customer.phone.as_deref(),
            },
            meta: request.meta,
            customizations: Customizations {
                title: PAYMENT_TITLE,
                description: PAYMENT_DESCRIPTION,
            },
        };

        let response = self.client.post(&url).json(&payload).send().await?;
        let data: InitiateData = read_envelope(response).await?;

        Ok(data.link)
    }

    #[instrument(skip(self))]
    async fn verify(&self, transaction_id: &str) -> Result<VerifiedTransaction, GatewayError> {
        let url = format!("{}/transactions/{transaction_id}/verify", self.base_url);

        let response = self.client.get(&url).send().await?;
        let data: VerifyData = read_envelope(response).await?;

        let meta = parse_meta(data.meta)?;

        Ok(VerifiedTransaction {
            status: data.status,
            amount: data.amount,
            currency: data.currency,
            meta,
        })
    }
}

/// Unwrap a Flutterwave response envelope, converting HTTP failures and
/// non-success envelopes into `Rejected`.
async fn read_envelope<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let http_status = response.status();
    let body = response.text().await?;

    let envelope: Envelope<T> = serde_json::from_str(&body)
        .map_err(|e| GatewayError::Parse(format!("malformed envelope: {e}")))?;

    if !http_status.is_success() || envelope.status != "success" {
        return Err(GatewayError::Rejected {
            http_status: http_status.as_u16(),
            message: envelope
                .message
                .unwrap_or_else(|| "payment gateway rejected the request".to_owned()),
        });
    }

    envelope
        .data
        .ok_or_else(|| GatewayError::Parse("success envelope without data".to_owned()))
}

/// Decode the round-tripped metadata defensively: a missing or malformed
/// meta object is a gateway error, never a panic.
fn parse_meta(meta: Option<serde_json::Value>) -> Result<PaymentMeta, GatewayError> {
    let value = meta.ok_or_else(|| GatewayError::InvalidMetadata("meta is missing".to_owned()))?;
    serde_json::from_value(value).map_err(|e| GatewayError::InvalidMetadata(e.to_string()))
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
struct PaymentPayload<'a> {
    tx_ref: String,
    amount: Decimal,
    currency: &'a str,
    redirect_url: &'a str,
    customer: CustomerPayload<'a>,
    meta: PaymentMeta,
    customizations: Customizations<'a>,
}

#[derive(Serialize)]
struct CustomerPayload<'a> {
    email: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phonenumber: Option<&'a str>,
}

#[derive(Serialize)]
struct Customizations<'a> {
    title: &'a str,
    description: &'a str,
}

/// Every Flutterwave response: `{status, message, data}`.
#[derive(Deserialize)]
struct Envelope<T> {
    status: String,
    message: Option<String>,
    data: Option<T>,
}

#[derive(Deserialize)]
struct InitiateData {
    link: String,
}

#[derive(Deserialize)]
struct VerifyData {
    status: String,
    amount: Decimal,
    currency: String,
    meta: Option<serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use grandeur_core::{OrderRef, UserId};
    use std::str::FromStr;

    #[test]
    fn test_initiate_envelope_deserializes() {
        let body = r#"{
            "status": "success",
            "message": "Hosted Link",
            "data": { "link": "https://checkout.flutterwave.com/v3/hosted/pay/abc123" }
        }"#;
        let envelope: Envelope<InitiateData> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.status, "success");
        assert!(envelope.data.unwrap().link.contains("hosted/pay"));
    }

    #[test]
    fn test_verify_envelope_deserializes() {
        let order_ref = OrderRef::generate();
        let body = format!(
            r#"{{
                "status": "success",
                "message": "Transaction fetched successfully",
                "data": {{
                    "status": "successful",
                    "amount": 36.5,
                    "currency": "NGN",
                    "meta": {{ "userId": 4, "order_id": "{order_ref}" }}
                }}
            }}"#
        );
        let envelope: Envelope<VerifyData> = serde_json::from_str(&body).unwrap();
        let data = envelope.data.unwrap();
        assert_eq!(data.status, "successful");
        assert_eq!(data.amount, Decimal::from_str("36.5").unwrap());

        let meta = parse_meta(data.meta).unwrap();
        assert_eq!(meta.user_id, UserId::new(4));
        assert_eq!(meta.order_ref, order_ref);
    }

    #[test]
    fn test_parse_meta_missing() {
        let err = parse_meta(None).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidMetadata(_)));
    }

    #[test]
    fn test_parse_meta_malformed() {
        let value = serde_json::json!({ "userId": "not-a-number" });
        let err = parse_meta(Some(value)).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidMetadata(_)));
    }

    #[test]
    fn test_parse_meta_bad_order_ref() {
        let value = serde_json::json!({ "userId": 4, "order_id": "not-a-uuid" });
        let err = parse_meta(Some(value)).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidMetadata(_)));
    }

    #[test]
    fn test_payment_payload_shape() {
        let payload = PaymentPayload {
            tx_ref: "ref-1".to_owned(),
            amount: Decimal::from_str("100.00").unwrap(),
            currency: "NGN",
            redirect_url: "https://grandeur.shop/thankyou",
            customer: CustomerPayload {
                email: "ada@example.com",
                name: "Ada Lovelace",
                phonenumber: None,
            },
            meta: PaymentMeta {
                user_id: UserId::new(4),
                order_ref: OrderRef::generate(),
            },
            customizations: Customizations {
                title: PAYMENT_TITLE,
                description: PAYMENT_DESCRIPTION,
            },
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["tx_ref"], "ref-1");
        assert_eq!(json["currency"], "NGN");
        assert_eq!(json["customer"]["email"], "ada@example.com");
        // Absent phone numbers are omitted, not sent as null
        assert!(json["customer"].get("phonenumber").is_none());
        assert_eq!(json["meta"]["userId"], 4);
    }
}
