//! Checkout route handlers.
//!
//! `verify` is the gateway-facing callback surface: the gateway (or a
//! redirected customer) may hit it more than once for the same
//! transaction, and a replay answers 200 with the existing receipt.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use grandeur_core::Email;

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::CheckoutService;
use crate::state::AppState;

/// Checkout initiation request body.
#[derive(Debug, Deserialize)]
pub struct InitiateBody {
    pub email: String,
}

/// Verification query parameters, as sent by the gateway redirect.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    pub transaction_id: Option<String>,
}

/// Start a checkout for the user's current cart.
#[instrument(skip(state, body))]
pub async fn initiate(
    State(state): State<AppState>,
    Json(body): Json<InitiateBody>,
) -> Result<impl IntoResponse> {
    let email = Email::parse(&body.email)
        .map_err(|e| AppError::Validation(format!("invalid email: {e}")))?;

    let session = CheckoutService::new(state.pool(), state.gateway(), state.payments())
        .initiate(&email)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Payment initialized successfully", session)),
    ))
}

/// Verify a transaction and return its receipt.
#[instrument(skip(state))]
pub async fn verify(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<impl IntoResponse> {
    let transaction_id = params.transaction_id.unwrap_or_default();

    let verified = CheckoutService::new(state.pool(), state.gateway(), state.payments())
        .verify(&transaction_id)
        .await?;

    let message = if verified.newly_created {
        "Payment successful"
    } else {
        "Payment already verified"
    };

    Ok(Json(ApiResponse::ok(message, verified)))
}
