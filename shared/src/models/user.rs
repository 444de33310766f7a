//! User Model

use serde::{Deserialize, Serialize};

use super::Role;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Super-role: bypasses all role checks
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: i64,
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Minimal user info for group membership listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
}

/// Authenticated user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub is_admin: bool,
}
