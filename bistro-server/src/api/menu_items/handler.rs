//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::auth::policy::{self, Operation};
use crate::core::ServerState;
use crate::db::repository::menu_item::{self, MenuItemFilter};
use crate::utils::validation::{MAX_TITLE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{MenuItemCreate, MenuItemResponse, MenuItemUpdate};
use shared::money;

/// Query params for the menu listing
#[derive(Debug, Deserialize)]
pub struct MenuItemQuery {
    /// Category display title
    pub category: Option<String>,
    /// Upper price bound (two-decimal amount)
    pub to_price: Option<Decimal>,
    /// Title substring search
    pub search: Option<String>,
    /// price | -price | title | -title
    pub ordering: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/menu-items - browse the menu (public)
///
/// An empty result is a success, not a 404.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuItemQuery>,
) -> AppResult<Json<Vec<MenuItemResponse>>> {
    let to_price = query
        .to_price
        .map(money::to_cents)
        .transpose()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let filter = MenuItemFilter {
        category: query.category,
        to_price,
        search: query.search,
        ordering: query.ordering,
        limit: query.limit.clamp(1, 200),
        offset: query.offset.max(0),
    };
    let items = menu_item::find_filtered(&state.pool, filter).await?;
    Ok(Json(items.into_iter().map(MenuItemResponse::from).collect()))
}

/// GET /api/menu-items/{id} - get a single menu item (public)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItemResponse>> {
    let item = menu_item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {id} not found")))?;
    Ok(Json(item.into()))
}

/// POST /api/menu-items - create a menu item
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItemResponse>> {
    policy::require(&current_user, Operation::ManageMenu)?;
    validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;

    let item = menu_item::create(&state.pool, payload).await?;

    tracing::info!(
        user_id = current_user.id,
        menu_item_id = item.id,
        title = %item.title,
        "Menu item created"
    );
    Ok(Json(item.into()))
}

/// PUT/PATCH /api/menu-items/{id} - update a menu item
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItemResponse>> {
    policy::require(&current_user, Operation::ManageMenu)?;
    validate_optional_text(payload.title.as_deref(), "title", MAX_TITLE_LEN)?;

    let item = menu_item::update(&state.pool, id, payload).await?;
    Ok(Json(item.into()))
}

/// DELETE /api/menu-items/{id} - delete a menu item
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    policy::require(&current_user, Operation::ManageMenu)?;
    let result = menu_item::delete(&state.pool, id).await?;

    tracing::info!(user_id = current_user.id, menu_item_id = id, "Menu item deleted");
    Ok(Json(result))
}
