//! User API Handlers

use axum::{Json, extract::State};

use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::validation::{validate_email, validate_password, validate_username};
use crate::utils::{AppError, AppResult};
use shared::models::{UserCreate, UserProfile};

/// POST /api/users - self-registration
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserProfile>> {
    validate_username(&payload.username)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let hash = password::hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let account =
        user::create(&state.pool, &payload.username, &payload.email, &hash, false).await?;

    tracing::info!(user_id = account.id, username = %account.username, "User registered");

    Ok(Json(UserProfile {
        id: account.id,
        username: account.username,
        email: account.email,
        roles: vec![],
        is_admin: false,
    }))
}

/// GET /api/users/me - current user profile
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserProfile>> {
    let account = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", current_user.id)))?;
    let roles = user::roles_of(&state.pool, account.id).await?;

    Ok(Json(UserProfile {
        id: account.id,
        username: account.username,
        email: account.email,
        roles,
        is_admin: account.is_admin,
    }))
}
