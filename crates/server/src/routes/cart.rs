//! Cart route handlers.
//!
//! All cart mutations address a (user, product) pair and respond with the
//! full current cart, so clients never merge partial state.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use grandeur_core::{ProductId, UserId};

use super::ApiResponse;
use crate::error::Result;
use crate::services::{AddItem, CartService, UpdateItem};
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddItemBody {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: Option<i32>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Line-item update request body. Absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateItemBody {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: Option<i32>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Remove-one-unit request body.
#[derive(Debug, Deserialize)]
pub struct RemoveItemBody {
    pub user_id: UserId,
    pub product_id: ProductId,
}

/// Add a product to the user's cart.
#[instrument(skip(state, body), fields(user_id = %body.user_id, product_id = %body.product_id))]
pub async fn add_item(
    State(state): State<AppState>,
    Json(body): Json<AddItemBody>,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.pool())
        .add_item(
            body.user_id,
            AddItem {
                product_id: body.product_id,
                quantity: body.quantity,
                size: body.size,
                color: body.color,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Item added to cart successfully", cart)),
    ))
}

/// Apply a partial update to a line item.
#[instrument(skip(state, body), fields(user_id = %body.user_id, product_id = %body.product_id))]
pub async fn update_item(
    State(state): State<AppState>,
    Json(body): Json<UpdateItemBody>,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.pool())
        .update_item(
            body.user_id,
            body.product_id,
            UpdateItem {
                quantity: body.quantity,
                size: body.size,
                color: body.color,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(
        "Cart item updated successfully",
        cart,
    )))
}

/// Remove one unit of a product from the cart.
#[instrument(skip(state, body), fields(user_id = %body.user_id, product_id = %body.product_id))]
pub async fn remove_item(
    State(state): State<AppState>,
    Json(body): Json<RemoveItemBody>,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.pool())
        .remove_item(body.user_id, body.product_id)
        .await?;

    Ok(Json(ApiResponse::ok(
        "Cart item removed successfully",
        cart,
    )))
}

/// Fetch the user's cart with resolved product data.
#[instrument(skip(state))]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.pool()).get_cart(user_id).await?;

    Ok(Json(ApiResponse::ok(
        "User cart fetched successfully",
        cart,
    )))
}
