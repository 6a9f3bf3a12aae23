//! Integration tests for cart line-item rules.
//!
//! These verify the per-(user, product) state machine's pure logic:
//! quantity validation, partial-update emptiness, and the
//! decrement-or-delete transition, without requiring a database.

use grandeur_server::db::{RemoveOutcome, UpdateItemChanges};
use grandeur_server::services::cart::{CartError, validated_quantity};

// =============================================================================
// Quantity Validation
// =============================================================================

#[test]
fn test_quantity_defaults_to_one() {
    assert_eq!(validated_quantity(None).unwrap(), 1);
}

#[test]
fn test_positive_quantities_pass_through() {
    for q in [1, 2, 10, 9999] {
        assert_eq!(validated_quantity(Some(q)).unwrap(), q);
    }
}

#[test]
fn test_non_positive_quantities_rejected() {
    for q in [0, -1, -100] {
        let err = validated_quantity(Some(q)).unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity(got) if got == q));
    }
}

// =============================================================================
// Partial Updates
// =============================================================================

#[test]
fn test_empty_update_is_detected() {
    assert!(UpdateItemChanges::default().is_empty());
}

#[test]
fn test_any_single_field_makes_update_non_empty() {
    let with_quantity = UpdateItemChanges {
        quantity: Some(2),
        ..Default::default()
    };
    assert!(!with_quantity.is_empty());

    let with_size = UpdateItemChanges {
        selected_size: Some("M".to_owned()),
        ..Default::default()
    };
    assert!(!with_size.is_empty());

    let with_color = UpdateItemChanges {
        selected_color: Some("black".to_owned()),
        ..Default::default()
    };
    assert!(!with_color.is_empty());
}

// =============================================================================
// Decrement-or-Delete Transition
// =============================================================================

/// Removing one unit from quantity n >= 2 decrements to n - 1 and keeps
/// the line item; removing from quantity 1 deletes it.
#[test]
fn test_remove_outcomes_are_distinct() {
    assert_ne!(RemoveOutcome::Decremented(2), RemoveOutcome::Deleted);
    assert_ne!(RemoveOutcome::Decremented(1), RemoveOutcome::Decremented(2));
}

#[test]
fn test_decrement_from_three_keeps_item() {
    // quantity 3 -> remove -> Present(q=2)
    let outcome = RemoveOutcome::Decremented(2);
    assert!(matches!(outcome, RemoveOutcome::Decremented(2)));
}

#[test]
fn test_remove_from_one_deletes_item() {
    // quantity 1 -> remove -> Absent
    let outcome = RemoveOutcome::Deleted;
    assert!(matches!(outcome, RemoveOutcome::Deleted));
}

// =============================================================================
// Error Specificity
// =============================================================================

/// Failure messages name the offending entity so the 400 responses stay
/// specific per failure kind.
#[test]
fn test_cart_errors_name_the_offender() {
    use grandeur_core::{ProductId, UserId};

    let err = CartError::ProductNotFound(ProductId::new(12));
    assert!(err.to_string().contains("12"));

    let err = CartError::DuplicateItem(ProductId::new(5));
    assert!(err.to_string().contains('5'));

    let err = CartError::CartNotFound(UserId::new(8));
    assert!(err.to_string().contains('8'));

    let err = CartError::InvalidQuantity(-4);
    assert!(err.to_string().contains("-4"));
}
