//! Product repository.
//!
//! Catalog CRUD lives elsewhere; the pipeline resolves products by ID when
//! items enter a cart, plus one insert used by the seeding CLI.

use grandeur_core::ProductId;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Product;

/// Repository for read-only product lookups.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, price, image
            FROM store.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a product. Used by the seeding CLI only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        price: Decimal,
        image: Option<&str>,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO store.product (name, price, image)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, image
            ",
        )
        .bind(name)
        .bind(price)
        .bind(image)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }
}
