//! User domain type.
//!
//! Users are owned by the account subsystem; the cart/checkout pipeline
//! only ever reads them.

use grandeur_core::{Email, UserId};
use serde::Serialize;

/// A store customer (read-only reference).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact phone number, if the user provided one.
    pub phone: Option<String>,
}

impl User {
    /// Full display name, as snapshotted onto receipts.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let user = User {
            id: UserId::new(1),
            email: Email::parse("ada@example.com").unwrap(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            phone: None,
        };
        assert_eq!(user.full_name(), "Ada Lovelace");
    }
}
