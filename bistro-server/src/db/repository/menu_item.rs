//! Menu Item Repository

use super::{RepoError, RepoResult};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::money;
use shared::util::snowflake_id;
use sqlx::SqlitePool;

const SELECT: &str = "SELECT mi.id, mi.title, mi.price, mi.featured, mi.category_id FROM menu_item mi";

/// Listing filter; all parts optional except pagination
#[derive(Debug, Clone, Default)]
pub struct MenuItemFilter {
    /// Match the category by its display title
    pub category: Option<String>,
    /// Upper price bound in cents
    pub to_price: Option<i64>,
    /// Case-insensitive title substring
    pub search: Option<String>,
    /// One of: price, -price, title, -title
    pub ordering: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

pub async fn find_filtered(pool: &SqlitePool, filter: MenuItemFilter) -> RepoResult<Vec<MenuItem>> {
    let mut sql = format!("{SELECT} JOIN category c ON mi.category_id = c.id");

    let mut clauses: Vec<&str> = Vec::new();
    if filter.category.is_some() {
        clauses.push("c.title = ?");
    }
    if filter.to_price.is_some() {
        clauses.push("mi.price <= ?");
    }
    if filter.search.is_some() {
        clauses.push("mi.title LIKE ?");
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    let order_clause = match filter.ordering.as_deref() {
        None => "mi.id ASC",
        Some("price") => "mi.price ASC",
        Some("-price") => "mi.price DESC",
        Some("title") => "mi.title ASC",
        Some("-title") => "mi.title DESC",
        Some(other) => {
            return Err(RepoError::Validation(format!("Unknown ordering: {other}")));
        }
    };
    sql.push_str(&format!(" ORDER BY {order_clause} LIMIT ? OFFSET ?"));

    let pattern = filter.search.as_ref().map(|s| format!("%{s}%"));
    let mut query = sqlx::query_as::<_, MenuItem>(&sql);
    if let Some(ref category) = filter.category {
        query = query.bind(category);
    }
    if let Some(to_price) = filter.to_price {
        query = query.bind(to_price);
    }
    if let Some(ref pattern) = pattern {
        query = query.bind(pattern);
    }
    let items = query
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(pool)
        .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>(&format!("{SELECT} WHERE mi.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

async fn ensure_category_exists(pool: &SqlitePool, category_id: i64) -> RepoResult<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM category WHERE id = ?")
        .bind(category_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(RepoError::Validation(format!(
            "Category {category_id} does not exist"
        )));
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItem> {
    let price = money::to_cents(data.price).map_err(|e| RepoError::Validation(e.to_string()))?;
    ensure_category_exists(pool, data.category_id).await?;

    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO menu_item (id, title, price, featured, category_id) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(&data.title)
    .bind(price)
    .bind(data.featured.unwrap_or(false))
    .bind(data.category_id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
    let price = data
        .price
        .map(money::to_cents)
        .transpose()
        .map_err(|e| RepoError::Validation(e.to_string()))?;
    if let Some(category_id) = data.category_id {
        ensure_category_exists(pool, category_id).await?;
    }

    let rows = sqlx::query(
        "UPDATE menu_item SET title = COALESCE(?1, title), price = COALESCE(?2, price), featured = COALESCE(?3, featured), category_id = COALESCE(?4, category_id) WHERE id = ?5",
    )
    .bind(data.title)
    .bind(price)
    .bind(data.featured)
    .bind(data.category_id)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

/// Delete a menu item. Cart lines referencing it are removed by cascade;
/// items frozen into placed orders keep it referenced and block deletion.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))?;

    let ordered: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM order_item WHERE menu_item_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if ordered > 0 {
        return Err(RepoError::Referenced(format!(
            "Menu item {id} appears in existing orders"
        )));
    }

    sqlx::query("DELETE FROM menu_item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}
