//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate, slugify};
use shared::util::snowflake_id;
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, title, slug FROM category ORDER BY title",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, title, slug FROM category WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn find_by_title(pool: &SqlitePool, title: &str) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, title, slug FROM category WHERE title = ? LIMIT 1",
    )
    .bind(title)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    if find_by_title(pool, &data.title).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Category '{}' already exists",
            data.title
        )));
    }

    let id = snowflake_id();
    let slug = data.slug.unwrap_or_else(|| slugify(&data.title));
    sqlx::query("INSERT INTO category (id, title, slug) VALUES (?1, ?2, ?3)")
        .bind(id)
        .bind(&data.title)
        .bind(&slug)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

    // Check duplicate title if changing
    if let Some(ref new_title) = data.title
        && new_title != &existing.title
        && find_by_title(pool, new_title).await?.is_some()
    {
        return Err(RepoError::Duplicate(format!(
            "Category '{new_title}' already exists"
        )));
    }

    let rows = sqlx::query(
        "UPDATE category SET title = COALESCE(?1, title), slug = COALESCE(?2, slug) WHERE id = ?3",
    )
    .bind(data.title)
    .bind(data.slug)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Delete a category. Protected while any menu item references it.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

    let in_use: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM menu_item WHERE category_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if in_use > 0 {
        return Err(RepoError::Referenced(format!(
            "Category {id} is referenced by {in_use} menu item(s)"
        )));
    }

    sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}
