//! Integration tests for the receipt response shape.
//!
//! Clients (and the idempotent-replay path) depend on the serialized
//! receipt: header fields flattened at the top level, items as an array,
//! and `newly_created` distinguishing first verification from replay.

use chrono::Utc;
use grandeur_core::{OrderRef, ProductId, ReceiptId, UserId};
use grandeur_server::models::{Receipt, ReceiptBundle, ReceiptItem};
use grandeur_server::services::checkout::VerifiedReceipt;
use rust_decimal::Decimal;
use std::str::FromStr;

fn bundle() -> ReceiptBundle {
    ReceiptBundle {
        receipt: Receipt {
            id: ReceiptId::new(1),
            order_ref: OrderRef::generate(),
            user_id: UserId::new(4),
            customer_name: "Ada Lovelace".to_owned(),
            customer_email: "ada@example.com".to_owned(),
            customer_phone: Some("+2348012345678".to_owned()),
            amount: Decimal::from_str("36.50").unwrap(),
            transaction_id: "tx-1".to_owned(),
            status: "successful".to_owned(),
            created_at: Utc::now(),
        },
        items: vec![
            ReceiptItem {
                product_id: ProductId::new(1),
                name: "Linen Shirt".to_owned(),
                unit_price: Decimal::from_str("10.00").unwrap(),
                image: None,
                quantity: 2,
                line_total: Decimal::from_str("20.00").unwrap(),
            },
            ReceiptItem {
                product_id: ProductId::new(2),
                name: "Wool Beanie".to_owned(),
                unit_price: Decimal::from_str("5.50").unwrap(),
                image: None,
                quantity: 3,
                line_total: Decimal::from_str("16.50").unwrap(),
            },
        ],
    }
}

#[test]
fn test_receipt_header_flattens_into_bundle() {
    let json = serde_json::to_value(bundle()).unwrap();

    // Header fields sit at the top level, not under a nested key
    assert_eq!(json["customer_name"], "Ada Lovelace");
    assert_eq!(json["transaction_id"], "tx-1");
    assert_eq!(json["status"], "successful");
    assert!(json.get("receipt").is_none());

    assert_eq!(json["items"].as_array().unwrap().len(), 2);
}

#[test]
fn test_item_totals_sum_to_receipt_amount() {
    let bundle = bundle();
    let combined: Decimal = bundle.items.iter().map(|item| item.line_total).sum();
    assert_eq!(combined, bundle.receipt.amount);
}

#[test]
fn test_verified_receipt_marks_replay() {
    let first = VerifiedReceipt {
        bundle: bundle(),
        newly_created: true,
    };
    let replay = VerifiedReceipt {
        bundle: bundle(),
        newly_created: false,
    };

    let first_json = serde_json::to_value(first).unwrap();
    let replay_json = serde_json::to_value(replay).unwrap();

    assert_eq!(first_json["newly_created"], true);
    assert_eq!(replay_json["newly_created"], false);

    // The receipt payload itself is identical either way
    assert_eq!(first_json["customer_name"], replay_json["customer_name"]);
    assert_eq!(first_json["items"], replay_json["items"]);
}

#[test]
fn test_order_ref_serializes_as_uuid_string() {
    let bundle = bundle();
    let order_ref = bundle.receipt.order_ref;
    let json = serde_json::to_value(bundle).unwrap();

    assert_eq!(json["order_ref"], order_ref.to_string());
    assert!(
        uuid::Uuid::parse_str(json["order_ref"].as_str().unwrap()).is_ok(),
        "order_ref must be a valid UUID on the wire"
    );
}
