//! User Repository
//!
//! Accounts plus the set-valued role memberships (`user_role` table).

use super::{RepoError, RepoResult};
use shared::models::{Role, User, UserSummary};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SELECT: &str = "SELECT id, username, email, password_hash, is_admin, is_active, created_at FROM user";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT} WHERE username = ? LIMIT 1"))
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Create a user account. The password arrives pre-hashed; raw passwords
/// never reach this layer.
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
    is_admin: bool,
) -> RepoResult<User> {
    if find_by_username(pool, username).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "User '{username}' already exists"
        )));
    }

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO user (id, username, email, password_hash, is_admin, is_active, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(is_admin)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Role set of a user. Unknown role strings (from manual edits) are skipped
/// with a warning rather than failing the whole lookup.
pub async fn roles_of(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Role>> {
    let names: Vec<String> =
        sqlx::query_scalar("SELECT role FROM user_role WHERE user_id = ? ORDER BY role")
            .bind(user_id)
            .fetch_all(pool)
            .await?;
    Ok(names
        .into_iter()
        .filter_map(|name| match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::warn!(user_id = user_id, error = %e, "Skipping unknown role row");
                None
            }
        })
        .collect())
}

pub async fn has_role(pool: &SqlitePool, user_id: i64, role: Role) -> RepoResult<bool> {
    let row: Option<i64> =
        sqlx::query_scalar("SELECT user_id FROM user_role WHERE user_id = ? AND role = ?")
            .bind(user_id)
            .bind(role.as_str())
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

/// Add a user to a role. Idempotent: returns `false` when the user was
/// already a member, `true` when the membership was created.
pub async fn add_role(pool: &SqlitePool, user_id: i64, role: Role) -> RepoResult<bool> {
    find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {user_id} not found")))?;

    let rows = sqlx::query("INSERT OR IGNORE INTO user_role (user_id, role) VALUES (?1, ?2)")
        .bind(user_id)
        .bind(role.as_str())
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Remove a user from a role. Returns `false` when there was no membership.
pub async fn remove_role(pool: &SqlitePool, user_id: i64, role: Role) -> RepoResult<bool> {
    find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {user_id} not found")))?;

    let rows = sqlx::query("DELETE FROM user_role WHERE user_id = ? AND role = ?")
        .bind(user_id)
        .bind(role.as_str())
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// All members of a role.
pub async fn in_role(pool: &SqlitePool, role: Role) -> RepoResult<Vec<UserSummary>> {
    let users = sqlx::query_as::<_, UserSummary>(
        "SELECT u.id, u.username FROM user u \
         JOIN user_role ur ON ur.user_id = u.id \
         WHERE ur.role = ? ORDER BY u.username",
    )
    .bind(role.as_str())
    .fetch_all(pool)
    .await?;
    Ok(users)
}
