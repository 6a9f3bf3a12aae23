//! Cart manager.
//!
//! All operations are scoped to a (user, product) pair and return the full
//! current cart on success. Per line item the state machine is:
//!
//! ```text
//! Absent --add--> Present(q=1..)        add while Present is a conflict
//! Present(q=n) --update--> Present(q=m) partial update, m > 0
//! Present(q=n>=2) --remove--> Present(q=n-1)
//! Present(q=1)    --remove--> Absent
//! ```

use grandeur_core::{ProductId, UserId};
use sqlx::PgPool;
use thiserror::Error;

use crate::db::{
    CartRepository, ProductRepository, RemoveOutcome, RepositoryError, UpdateItemChanges,
};
use crate::models::{Cart, CartView};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product id does not resolve in the catalog.
    #[error("product {0} does not exist")]
    ProductNotFound(ProductId),

    /// The product is already in the cart. Adds are a hard reject, not a
    /// merge - callers who want more units use update.
    #[error("product {0} is already in the cart")]
    DuplicateItem(ProductId),

    /// The user has no cart.
    #[error("cart does not exist for user {0}")]
    CartNotFound(UserId),

    /// The cart has no line item for the product.
    #[error("product {0} is not in the cart")]
    ItemNotFound(ProductId),

    /// An update request that changes nothing.
    #[error("no fields to update")]
    NoFieldsToUpdate,

    /// Quantities must be positive integers.
    #[error("quantity must be a positive integer, got {0}")]
    InvalidQuantity(i32),

    /// Storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Parameters for adding a product to a cart.
#[derive(Debug, Clone)]
pub struct AddItem {
    pub product_id: ProductId,
    /// Defaults to 1 when omitted.
    pub quantity: Option<i32>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Parameters for a partial line-item update. A `None` field is left
/// untouched, never reset.
#[derive(Debug, Clone, Default)]
pub struct UpdateItem {
    pub quantity: Option<i32>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Validate an optional quantity, applying the default of 1.
///
/// # Errors
///
/// Returns `CartError::InvalidQuantity` for zero or negative quantities.
pub fn validated_quantity(quantity: Option<i32>) -> Result<i32, CartError> {
    match quantity {
        None => Ok(1),
        Some(q) if q > 0 => Ok(q),
        Some(q) => Err(CartError::InvalidQuantity(q)),
    }
}

/// Business logic for a user's cart.
pub struct CartService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartService<'a> {
    /// Create a new cart service on the shared pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a product to the user's cart, creating the cart if absent.
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` for a non-positive quantity
    /// - `ProductNotFound` if the product id does not resolve
    /// - `DuplicateItem` if the product is already in the cart
    pub async fn add_item(&self, user_id: UserId, request: AddItem) -> Result<CartView, CartError> {
        let quantity = validated_quantity(request.quantity)?;

        let product = ProductRepository::new(self.pool)
            .get_by_id(request.product_id)
            .await?
            .ok_or(CartError::ProductNotFound(request.product_id))?;

        let carts = CartRepository::new(self.pool);
        let cart = carts.get_or_create(user_id).await?;

        match carts
            .insert_item(
                cart.id,
                product.id,
                quantity,
                request.size.as_deref(),
                request.color.as_deref(),
            )
            .await
        {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => {
                return Err(CartError::DuplicateItem(product.id));
            }
            Err(e) => return Err(e.into()),
        }

        self.view(&carts, cart).await
    }

    /// Apply a partial update to an existing line item.
    ///
    /// # Errors
    ///
    /// - `NoFieldsToUpdate` if the request supplies nothing
    /// - `InvalidQuantity` for a non-positive quantity
    /// - `CartNotFound` / `ItemNotFound` when either is absent
    pub async fn update_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        request: UpdateItem,
    ) -> Result<CartView, CartError> {
        let changes = UpdateItemChanges {
            quantity: request.quantity,
            selected_size: request.size,
            selected_color: request.color,
        };

        if changes.is_empty() {
            return Err(CartError::NoFieldsToUpdate);
        }
        if let Some(q) = changes.quantity
            && q <= 0
        {
            return Err(CartError::InvalidQuantity(q));
        }

        let carts = CartRepository::new(self.pool);
        let cart = carts
            .find_by_user(user_id)
            .await?
            .ok_or(CartError::CartNotFound(user_id))?;

        match carts.update_item(cart.id, product_id, &changes).await {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => return Err(CartError::ItemNotFound(product_id)),
            Err(e) => return Err(e.into()),
        }

        self.view(&carts, cart).await
    }

    /// Remove exactly one unit of a product: decrement above one, delete
    /// the line item at one.
    ///
    /// # Errors
    ///
    /// - `CartNotFound` / `ItemNotFound` when either is absent
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<CartView, CartError> {
        let carts = CartRepository::new(self.pool);
        let cart = carts
            .find_by_user(user_id)
            .await?
            .ok_or(CartError::CartNotFound(user_id))?;

        let outcome = match carts.remove_one(cart.id, product_id).await {
            Ok(outcome) => outcome,
            Err(RepositoryError::NotFound) => return Err(CartError::ItemNotFound(product_id)),
            Err(e) => return Err(e.into()),
        };

        match outcome {
            RemoveOutcome::Decremented(remaining) => {
                tracing::debug!(%user_id, %product_id, remaining, "decremented line item");
            }
            RemoveOutcome::Deleted => {
                tracing::debug!(%user_id, %product_id, "deleted line item");
            }
        }

        self.view(&carts, cart).await
    }

    /// The user's cart with all line items and resolved product data.
    ///
    /// # Errors
    ///
    /// - `CartNotFound` if the user has no cart
    pub async fn get_cart(&self, user_id: UserId) -> Result<CartView, CartError> {
        let carts = CartRepository::new(self.pool);
        let cart = carts
            .find_by_user(user_id)
            .await?
            .ok_or(CartError::CartNotFound(user_id))?;

        self.view(&carts, cart).await
    }

    async fn view(&self, carts: &CartRepository<'_>, cart: Cart) -> Result<CartView, CartError> {
        let items = carts.items_with_products(cart.id).await?;
        Ok(CartView {
            id: cart.id,
            user_id: cart.user_id,
            items,
        })
    }
}
