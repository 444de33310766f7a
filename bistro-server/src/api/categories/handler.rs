//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::policy::{self, Operation};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::category;
use crate::utils::validation::{MAX_TITLE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

/// GET /api/categories - list all categories (public)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id} - get a single category (public)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let cat = category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))?;
    Ok(Json(cat))
}

/// POST /api/categories - create a category
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    policy::require(&current_user, Operation::ManageMenu)?;
    validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;
    validate_optional_text(payload.slug.as_deref(), "slug", MAX_TITLE_LEN)?;

    let cat = category::create(&state.pool, payload).await?;

    tracing::info!(
        user_id = current_user.id,
        category_id = cat.id,
        title = %cat.title,
        "Category created"
    );
    Ok(Json(cat))
}

/// PUT /api/categories/{id} - update a category
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    policy::require(&current_user, Operation::ManageMenu)?;
    validate_optional_text(payload.title.as_deref(), "title", MAX_TITLE_LEN)?;
    validate_optional_text(payload.slug.as_deref(), "slug", MAX_TITLE_LEN)?;

    let cat = category::update(&state.pool, id, payload).await?;
    Ok(Json(cat))
}

/// DELETE /api/categories/{id} - delete a category
///
/// Protected: fails with a conflict while menu items reference it.
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    policy::require(&current_user, Operation::ManageMenu)?;
    let result = category::delete(&state.pool, id).await?;

    tracing::info!(user_id = current_user.id, category_id = id, "Category deleted");
    Ok(Json(result))
}
