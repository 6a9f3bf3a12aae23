//! Database operations for the store `PostgreSQL` database.
//!
//! # Tables (schema `store`)
//!
//! - `user`, `product` - owned by the account/catalog subsystems, read-only
//!   here
//! - `cart`, `cart_item` - one cart per user, one line item per
//!   (cart, product)
//! - `receipt`, `receipt_item` - immutable purchase records
//!
//! Queries bind at runtime (`sqlx::query` / `query_as` with `FromRow`
//! models); the constraints that carry the pipeline's invariants live in
//! `crates/server/migrations/`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p grandeur-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod carts;
pub mod products;
pub mod receipts;
pub mod users;

pub use carts::{CartRepository, RemoveOutcome, UpdateItemChanges};
pub use products::ProductRepository;
pub use receipts::ReceiptRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate line item, duplicate order ref).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// Opened once at process start and injected into every repository; no
/// component opens its own connection.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to `Conflict` when it is a unique violation, passing
/// everything else through as `Database`.
fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
