//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `BASE_URL` - Public URL for the store
//! - `FLUTTERWAVE_SECRET_KEY` - Payment gateway credential
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `FLUTTERWAVE_BASE_URL` - Gateway API base (default: Flutterwave v3)
//! - `CHECKOUT_REDIRECT_URL` - Post-payment redirect (default: `{BASE_URL}/thankyou`)
//! - `PAYMENT_CURRENCY` - ISO 4217 settlement currency (default: NGN)
//! - `GATEWAY_TIMEOUT_SECS` - Outbound gateway timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use grandeur_core::Currency;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default Flutterwave API base URL.
const DEFAULT_GATEWAY_BASE_URL: &str = "https://api.flutterwave.com/v3";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the store
    pub base_url: String,
    /// Payment gateway configuration
    pub payments: PaymentsConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Payment gateway configuration.
///
/// Implements `Debug` manually to redact the credential.
#[derive(Clone)]
pub struct PaymentsConfig {
    /// Gateway secret key, sent as a bearer credential
    pub secret_key: SecretString,
    /// Gateway API base URL
    pub base_url: String,
    /// Where the gateway sends the customer after payment
    pub redirect_url: String,
    /// Settlement currency for all initiated payments
    pub currency: Currency,
    /// Bound on every outbound gateway request
    pub timeout: Duration,
}

impl std::fmt::Debug for PaymentsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentsConfig")
            .field("secret_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("redirect_url", &self.redirect_url)
            .field("currency", &self.currency)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_required_secret("DATABASE_URL")?;
        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_owned(), e.to_string()))?;
        let base_url = get_valid_url("BASE_URL")?;

        let payments = PaymentsConfig::from_env(&base_url)?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            payments,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PaymentsConfig {
    fn from_env(base_url: &str) -> Result<Self, ConfigError> {
        let currency = get_env_or_default("PAYMENT_CURRENCY", "NGN")
            .parse::<Currency>()
            .map_err(|e| ConfigError::InvalidEnvVar("PAYMENT_CURRENCY".to_owned(), e))?;

        let timeout_secs = get_env_or_default("GATEWAY_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GATEWAY_TIMEOUT_SECS".to_owned(), e.to_string())
            })?;

        Ok(Self {
            secret_key: get_required_secret("FLUTTERWAVE_SECRET_KEY")?,
            base_url: get_env_or_default("FLUTTERWAVE_BASE_URL", DEFAULT_GATEWAY_BASE_URL),
            redirect_url: std::env::var("CHECKOUT_REDIRECT_URL")
                .unwrap_or_else(|_| format!("{base_url}/thankyou")),
            currency,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Get a required environment variable that must parse as a URL.
fn get_valid_url(key: &str) -> Result<String, ConfigError> {
    let value = get_required_env(key)?;
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))?;
    Ok(value)
}
