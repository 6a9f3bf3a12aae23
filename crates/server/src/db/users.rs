//! User repository.
//!
//! The account subsystem owns this table; the pipeline only reads it, plus
//! one insert used by the seeding CLI.

use grandeur_core::{Email, UserId};
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::User;

/// Repository for read-only user lookups.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, email, first_name, last_name, phone
            FROM store.user
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, email, first_name, last_name, phone
            FROM store.user
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create a user. Used by the seeding CLI only - registration proper
    /// lives in the account subsystem.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            INSERT INTO store.user (email, first_name, last_name, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, first_name, last_name, phone
            ",
        )
        .bind(email.as_str())
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .fetch_one(self.pool)
        .await
        .map_err(|e| super::conflict_on_unique(e, "email already exists"))?;

        Ok(user)
    }
}
