//! Integration tests for checkout totals and receipt snapshots.
//!
//! The order total computed at initiation and the sum of the frozen
//! receipt line totals must agree: both derive from the same cart
//! snapshot through `line_total`.

use grandeur_core::{CartId, ProductId, UserId, order_total};
use grandeur_server::models::{CartLine, CartView, Product};
use grandeur_server::services::checkout::snapshot_items;
use rust_decimal::Decimal;
use std::str::FromStr;

fn product(id: i32, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("product-{id}"),
        price: Decimal::from_str(price).unwrap(),
        image: None,
    }
}

fn cart_with(lines: Vec<CartLine>) -> CartView {
    CartView {
        id: CartId::new(1),
        user_id: UserId::new(1),
        items: lines,
    }
}

fn line(id: i32, price: &str, quantity: i32) -> CartLine {
    CartLine {
        product: product(id, price),
        quantity,
        selected_size: None,
        selected_color: None,
    }
}

#[test]
fn test_total_for_two_line_items() {
    // 10.00 x 2 + 5.50 x 3 = 36.50
    let cart = cart_with(vec![line(1, "10.00", 2), line(2, "5.50", 3)]);
    assert_eq!(cart.total(), Decimal::from_str("36.50").unwrap());
}

#[test]
fn test_order_total_matches_cart_view_total() {
    let cart = cart_with(vec![line(1, "10.00", 2), line(2, "5.50", 3)]);
    let total = order_total(
        cart.items
            .iter()
            .map(|item| (item.product.price, item.quantity)),
    );
    assert_eq!(total, cart.total());
}

#[test]
fn test_snapshot_totals_match_cart_total() {
    // The receipt's combined line totals must equal the cart total the
    // customer was charged for.
    let cart = cart_with(vec![
        line(1, "10.00", 1),
        line(2, "25.99", 2),
        line(3, "0.01", 100),
    ]);

    let snapshots = snapshot_items(&cart.items);
    let combined: Decimal = snapshots.iter().map(|s| s.line_total).sum();

    assert_eq!(combined, cart.total());
}

#[test]
fn test_snapshot_freezes_product_data() {
    let cart = cart_with(vec![CartLine {
        product: Product {
            id: ProductId::new(4),
            name: "Linen Shirt".to_owned(),
            price: Decimal::from_str("45.00").unwrap(),
            image: Some("https://img.grandeur.shop/linen-shirt.jpg".to_owned()),
        },
        quantity: 2,
        selected_size: Some("M".to_owned()),
        selected_color: None,
    }]);

    let snapshots = snapshot_items(&cart.items);
    assert_eq!(snapshots.len(), 1);

    let snapshot = snapshots.first().unwrap();
    assert_eq!(snapshot.product_id, ProductId::new(4));
    assert_eq!(snapshot.name, "Linen Shirt");
    assert_eq!(snapshot.unit_price, Decimal::from_str("45.00").unwrap());
    assert_eq!(snapshot.quantity, 2);
    assert_eq!(snapshot.line_total, Decimal::from_str("90.00").unwrap());
}

#[test]
fn test_one_snapshot_per_cart_line() {
    let cart = cart_with(vec![line(1, "1.00", 1), line(2, "2.00", 2)]);
    assert_eq!(snapshot_items(&cart.items).len(), 2);
}
