//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::{PaymentsConfig, ServerConfig};
use crate::payments::{FlutterwaveClient, GatewayError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The pool and the gateway client are opened
/// once at process start and live here for the process lifetime; nothing
/// else holds connection state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    gateway: FlutterwaveClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway client fails to build.
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, GatewayError> {
        let gateway = FlutterwaveClient::new(&config.payments)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                gateway,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the payment gateway configuration.
    #[must_use]
    pub fn payments(&self) -> &PaymentsConfig {
        &self.inner.config.payments
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the payment gateway client.
    #[must_use]
    pub fn gateway(&self) -> &FlutterwaveClient {
        &self.inner.gateway
    }
}
