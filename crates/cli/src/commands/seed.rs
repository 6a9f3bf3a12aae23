//! Seed the database with sample users and products.
//!
//! Intended for development and demo environments; inserts are not
//! idempotent, so run against a fresh database.

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use tracing::info;

use grandeur_core::Email;
use grandeur_server::db::{self, ProductRepository, RepositoryError, UserRepository};

/// Errors from the seed command.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid seed data: {0}")]
    InvalidData(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Sample catalog rows: name, price, image.
const PRODUCTS: &[(&str, &str, &str)] = &[
    (
        "Linen Shirt",
        "45.00",
        "https://img.grandeur.shop/linen-shirt.jpg",
    ),
    (
        "Denim Jacket",
        "120.00",
        "https://img.grandeur.shop/denim-jacket.jpg",
    ),
    (
        "Canvas Sneakers",
        "75.50",
        "https://img.grandeur.shop/canvas-sneakers.jpg",
    ),
    (
        "Wool Beanie",
        "18.00",
        "https://img.grandeur.shop/wool-beanie.jpg",
    ),
];

/// Sample account rows: email, first name, last name, phone.
const USERS: &[(&str, &str, &str, Option<&str>)] = &[
    ("ada@example.com", "Ada", "Lovelace", Some("+2348012345678")),
    ("grace@example.com", "Grace", "Hopper", None),
];

/// Insert sample users and products.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is not set, the connection fails,
/// or any insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("DATABASE_URL"))?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let users = UserRepository::new(&pool);
    for (email, first_name, last_name, phone) in USERS {
        let email = Email::parse(email).map_err(|e| SeedError::InvalidData(e.to_string()))?;
        let user = users.create(&email, first_name, last_name, *phone).await?;
        info!(user_id = %user.id, %email, "seeded user");
    }

    let products = ProductRepository::new(&pool);
    for (name, price, image) in PRODUCTS {
        let price = price
            .parse::<Decimal>()
            .map_err(|e| SeedError::InvalidData(e.to_string()))?;
        let product = products.create(name, price, Some(*image)).await?;
        info!(product_id = %product.id, name, "seeded product");
    }

    info!("Seeding complete!");
    Ok(())
}
