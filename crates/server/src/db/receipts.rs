//! Receipt repository.
//!
//! The header and its line-item batch are written in one transaction:
//! a receipt with no items, or items without a receipt, must never be
//! observable. The unique constraint on `order_ref` is what makes
//! verification exactly-once - a losing concurrent insert surfaces as
//! `Conflict` and the caller re-reads the winner's row.

use grandeur_core::OrderRef;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{NewReceipt, NewReceiptItem, Receipt, ReceiptBundle, ReceiptItem};

/// Repository for receipt reads and the one-shot receipt insert.
pub struct ReceiptRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReceiptRepository<'a> {
    /// Create a new receipt repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a receipt (with items) by its order reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_order_ref(
        &self,
        order_ref: OrderRef,
    ) -> Result<Option<ReceiptBundle>, RepositoryError> {
        let receipt = sqlx::query_as::<_, Receipt>(
            r"
            SELECT id, order_ref, user_id, customer_name, customer_email,
                   customer_phone, amount, transaction_id, status, created_at
            FROM store.receipt
            WHERE order_ref = $1
            ",
        )
        .bind(order_ref)
        .fetch_optional(self.pool)
        .await?;

        let Some(receipt) = receipt else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, ReceiptItem>(
            r"
            SELECT product_id, name, unit_price, image, quantity, line_total
            FROM store.receipt_item
            WHERE receipt_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(receipt.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(ReceiptBundle { receipt, items }))
    }

    /// Create a receipt and all of its line items in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a receipt already exists for
    /// the order reference (a concurrent verification won the race).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_items(
        &self,
        new_receipt: &NewReceipt,
        new_items: &[NewReceiptItem],
    ) -> Result<ReceiptBundle, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let receipt = sqlx::query_as::<_, Receipt>(
            r"
            INSERT INTO store.receipt (
                order_ref, user_id, customer_name, customer_email,
                customer_phone, amount, transaction_id, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, order_ref, user_id, customer_name, customer_email,
                      customer_phone, amount, transaction_id, status, created_at
            ",
        )
        .bind(new_receipt.order_ref)
        .bind(new_receipt.user_id)
        .bind(&new_receipt.customer_name)
        .bind(&new_receipt.customer_email)
        .bind(new_receipt.customer_phone.as_deref())
        .bind(new_receipt.amount)
        .bind(&new_receipt.transaction_id)
        .bind(&new_receipt.status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| super::conflict_on_unique(e, "receipt already exists for order"))?;

        let mut items = Vec::with_capacity(new_items.len());
        for item in new_items {
            let inserted = sqlx::query_as::<_, ReceiptItem>(
                r"
                INSERT INTO store.receipt_item (
                    receipt_id, product_id, name, unit_price, image, quantity, line_total
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING product_id, name, unit_price, image, quantity, line_total
                ",
            )
            .bind(receipt.id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(item.unit_price)
            .bind(item.image.as_deref())
            .bind(item.quantity)
            .bind(item.line_total)
            .fetch_one(&mut *tx)
            .await?;

            items.push(inserted);
        }

        tx.commit().await?;

        Ok(ReceiptBundle { receipt, items })
    }
}
