//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Wire mapping follows the pre-existing contract: business failures
//! (validation, not-found, conflicts, unsuccessful payments) are 400 with
//! a specific JSON message; an unreachable gateway is 502; storage and
//! other internal failures are a generic 500 with detail kept to logs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::payments::GatewayError;
use crate::routes::ApiResponse;
use crate::services::{CartError, CheckoutError};

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart operation failed.
    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout operation failed.
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Database operation failed outside a service.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Malformed request input; the message names the offending field.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Generic message for failures whose detail must not reach clients.
const INTERNAL_MESSAGE: &str = "Internal server error, please try again later";

impl AppError {
    /// Status and client-visible message for this error.
    fn wire_parts(&self) -> (StatusCode, String) {
        match self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            Self::Cart(err) => match err {
                CartError::Repository(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_owned())
                }
                _ => (StatusCode::BAD_REQUEST, err.to_string()),
            },

            Self::Checkout(err) => match err {
                CheckoutError::Repository(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_owned())
                }
                CheckoutError::Gateway(gateway) => gateway_wire_parts(gateway),
                _ => (StatusCode::BAD_REQUEST, err.to_string()),
            },

            Self::Database(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_owned())
            }
        }
    }

    /// Whether this error should be captured to Sentry.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Internal(_) => true,
            Self::Cart(err) => matches!(err, CartError::Repository(_)),
            Self::Checkout(err) => matches!(
                err,
                CheckoutError::Repository(_)
                    | CheckoutError::Gateway(GatewayError::Http(_) | GatewayError::Parse(_))
            ),
            Self::Validation(_) => false,
        }
    }
}

/// Distinguish "gateway unreachable" from "gateway rejected": transport
/// failures and undecodable responses are 502, an explicit rejection is a
/// 400 carrying the gateway's own message.
fn gateway_wire_parts(err: &GatewayError) -> (StatusCode, String) {
    match err {
        GatewayError::Http(_) => (
            StatusCode::BAD_GATEWAY,
            "Payment gateway unreachable, please try again later".to_owned(),
        ),
        GatewayError::Rejected { message, .. } => (StatusCode::BAD_REQUEST, message.clone()),
        GatewayError::Parse(_) | GatewayError::InvalidMetadata(_) => (
            StatusCode::BAD_GATEWAY,
            "Payment gateway returned an invalid response".to_owned(),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let (status, message) = self.wire_parts();
        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
