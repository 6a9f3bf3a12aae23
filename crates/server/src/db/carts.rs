//! Cart repository.
//!
//! Line items are addressed by the composite key `(cart_id, product_id)`.
//! Every mutation here is a single atomic conditional write (or a
//! transaction holding a row lock on that key) - never a separate
//! existence check followed by a write, which would lose updates under
//! concurrent calls on the same key.

use grandeur_core::{CartId, ProductId, UserId};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{Cart, CartLine, Product};

/// Fields a line-item update may change. `None` leaves the stored value
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateItemChanges {
    pub quantity: Option<i32>,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
}

impl UpdateItemChanges {
    /// True when the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.selected_size.is_none() && self.selected_color.is_none()
    }
}

/// Result of removing one unit from a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Quantity was above one; it was decremented to the contained value.
    Decremented(i32),
    /// Quantity was one; the line item was deleted.
    Deleted,
}

/// Joined row: one cart line with its product columns.
#[derive(sqlx::FromRow)]
struct CartLineRow {
    product_id: ProductId,
    quantity: i32,
    selected_size: Option<String>,
    selected_color: Option<String>,
    name: String,
    price: Decimal,
    image: Option<String>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            product: Product {
                id: row.product_id,
                name: row.name,
                price: row.price,
                image: row.image,
            },
            quantity: row.quantity,
            selected_size: row.selected_size,
            selected_color: row.selected_color,
        }
    }
}

/// Repository for cart and line-item operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating it if absent.
    ///
    /// The upsert rides on the UNIQUE constraint on `user_id`, so two
    /// concurrent first-adds converge on the same row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            r"
            INSERT INTO store.cart (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, user_id
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(cart)
    }

    /// Find the user's cart without creating one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            r"
            SELECT id, user_id
            FROM store.cart
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(cart)
    }

    /// Insert a new line item.
    ///
    /// The composite primary key makes this insert-or-fail: if the product
    /// is already in the cart the insert conflicts and surfaces as
    /// `Conflict`, leaving the existing row untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the line item already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
        selected_size: Option<&str>,
        selected_color: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO store.cart_item (cart_id, product_id, quantity, selected_size, selected_color)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(selected_size)
        .bind(selected_color)
        .execute(self.pool)
        .await
        .map_err(|e| super::conflict_on_unique(e, "item already in cart"))?;

        Ok(())
    }

    /// Apply a partial update to a line item in one statement.
    ///
    /// Unsupplied fields keep their stored value via COALESCE.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        changes: &UpdateItemChanges,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE store.cart_item
            SET quantity = COALESCE($3, quantity),
                selected_size = COALESCE($4, selected_size),
                selected_color = COALESCE($5, selected_color),
                updated_at = now()
            WHERE cart_id = $1 AND product_id = $2
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(changes.quantity)
        .bind(changes.selected_size.as_deref())
        .bind(changes.selected_color.as_deref())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Remove exactly one unit from a line item: decrement when the
    /// quantity is above one, delete the row when it is one.
    ///
    /// Runs in a transaction with a `FOR UPDATE` lock on the row, so two
    /// concurrent removals of the same key serialize instead of both
    /// reading the same quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove_one(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<RemoveOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let quantity: Option<i32> = sqlx::query_scalar(
            r"
            SELECT quantity
            FROM store.cart_item
            WHERE cart_id = $1 AND product_id = $2
            FOR UPDATE
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(quantity) = quantity else {
            return Err(RepositoryError::NotFound);
        };

        let outcome = if quantity > 1 {
            sqlx::query(
                r"
                UPDATE store.cart_item
                SET quantity = quantity - 1, updated_at = now()
                WHERE cart_id = $1 AND product_id = $2
                ",
            )
            .bind(cart_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

            RemoveOutcome::Decremented(quantity - 1)
        } else {
            sqlx::query(
                r"
                DELETE FROM store.cart_item
                WHERE cart_id = $1 AND product_id = $2
                ",
            )
            .bind(cart_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

            RemoveOutcome::Deleted
        };

        tx.commit().await?;

        Ok(outcome)
    }

    /// All line items in a cart with their products resolved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_with_products(
        &self,
        cart_id: CartId,
    ) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT ci.product_id, ci.quantity, ci.selected_size, ci.selected_color,
                   p.name, p.price, p.image
            FROM store.cart_item ci
            JOIN store.product p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.created_at ASC
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLine::from).collect())
    }
}
