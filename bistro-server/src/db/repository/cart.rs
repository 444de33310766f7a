//! Cart Repository
//!
//! One row per (user, menu item). The add path is a single upsert statement
//! so concurrent adds for the same key cannot lose an increment.

use super::{RepoError, RepoResult};
use shared::models::CartLineDetail;
use sqlx::SqlitePool;

const DETAIL_SELECT: &str = "SELECT cl.menu_item_id, mi.title, cl.quantity, cl.unit_price, cl.line_total FROM cart_line cl JOIN menu_item mi ON cl.menu_item_id = mi.id";

pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<CartLineDetail>> {
    let sql = format!("{DETAIL_SELECT} WHERE cl.user_id = ? ORDER BY mi.title");
    let lines = sqlx::query_as::<_, CartLineDetail>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(lines)
}

/// Add a menu item to the cart, or increment the existing line.
///
/// The unit price is refreshed from the current menu item price and the line
/// total recomputed from the new quantity, all inside one statement.
pub async fn add_or_increment(
    pool: &SqlitePool,
    user_id: i64,
    menu_item_id: i64,
    quantity: i64,
) -> RepoResult<CartLineDetail> {
    if quantity <= 0 {
        return Err(RepoError::Validation(format!(
            "Quantity must be positive, got {quantity}"
        )));
    }

    let price: Option<i64> = sqlx::query_scalar("SELECT price FROM menu_item WHERE id = ?")
        .bind(menu_item_id)
        .fetch_optional(pool)
        .await?;
    let price = price.ok_or_else(|| {
        RepoError::Validation(format!("Menu item {menu_item_id} does not exist"))
    })?;

    sqlx::query(
        "INSERT INTO cart_line (user_id, menu_item_id, quantity, unit_price, line_total) \
         VALUES (?1, ?2, ?3, ?4, ?3 * ?4) \
         ON CONFLICT (user_id, menu_item_id) DO UPDATE SET \
             quantity = cart_line.quantity + excluded.quantity, \
             unit_price = excluded.unit_price, \
             line_total = (cart_line.quantity + excluded.quantity) * excluded.unit_price",
    )
    .bind(user_id)
    .bind(menu_item_id)
    .bind(quantity)
    .bind(price)
    .execute(pool)
    .await?;

    let sql = format!("{DETAIL_SELECT} WHERE cl.user_id = ? AND cl.menu_item_id = ?");
    sqlx::query_as::<_, CartLineDetail>(&sql)
        .bind(user_id)
        .bind(menu_item_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to upsert cart line".into()))
}

pub async fn remove_line(pool: &SqlitePool, user_id: i64, menu_item_id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM cart_line WHERE user_id = ? AND menu_item_id = ?")
        .bind(user_id)
        .bind(menu_item_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Cart line for menu item {menu_item_id} not found"
        )));
    }
    Ok(())
}

/// Remove every cart line of the user. Idempotent.
pub async fn clear_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM cart_line WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
