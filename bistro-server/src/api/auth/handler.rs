//! Authentication Handlers
//!
//! Handles login and token issuance

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::password;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::UserProfile;

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with JWT token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// POST /api/auth/login - authenticate and return a JWT
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    let account = user::find_by_username(&state.pool, &req.username)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !account.is_active {
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let password_valid = password::verify_password(&req.password, &account.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !password_valid {
        return Err(AppError::invalid_credentials());
    }

    let roles = user::roles_of(&state.pool, account.id).await?;

    let token = state
        .get_jwt_service()
        .generate_token(account.id, &account.username, &roles, account.is_admin)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = account.id,
        username = %account.username,
        "User logged in successfully"
    );

    Ok(ok(LoginResponse {
        token,
        user: UserProfile {
            id: account.id,
            username: account.username,
            email: account.email,
            roles,
            is_admin: account.is_admin,
        },
    }))
}
