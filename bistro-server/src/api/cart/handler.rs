//! Cart API Handlers
//!
//! All operations act on the authenticated user's own cart.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::auth::policy::{self, Operation};
use crate::core::ServerState;
use crate::db::repository::cart;
use crate::utils::AppResult;
use shared::models::{CartAdd, CartLineResponse};

/// GET /api/cart - list the caller's cart lines
pub async fn get_cart(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<CartLineResponse>>> {
    policy::require(&current_user, Operation::ViewCart)?;
    let lines = cart::list_for_user(&state.pool, current_user.id).await?;
    Ok(Json(lines.into_iter().map(CartLineResponse::from).collect()))
}

/// POST /api/cart - add a menu item, or increment the existing line
pub async fn add(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CartAdd>,
) -> AppResult<Json<CartLineResponse>> {
    policy::require(&current_user, Operation::ViewCart)?;
    let line = cart::add_or_increment(
        &state.pool,
        current_user.id,
        payload.menu_item_id,
        payload.quantity,
    )
    .await?;
    Ok(Json(line.into()))
}

/// DELETE /api/cart/{menu_item_id} - remove one line
pub async fn remove(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(menu_item_id): Path<i64>,
) -> AppResult<Json<bool>> {
    policy::require(&current_user, Operation::ViewCart)?;
    cart::remove_line(&state.pool, current_user.id, menu_item_id).await?;
    Ok(Json(true))
}

/// DELETE /api/cart - clear the whole cart (idempotent)
pub async fn clear(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<u64>> {
    policy::require(&current_user, Operation::ViewCart)?;
    let removed = cart::clear_for_user(&state.pool, current_user.id).await?;
    Ok(Json(removed))
}
