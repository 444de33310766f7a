//! Order Repository
//!
//! Checkout and the order lifecycle. Checkout runs inside one transaction:
//! the order and its items persist and the cart empties, or nothing changes.

use super::{RepoError, RepoResult};
use shared::models::{CartLine, Order, OrderItemDetail, Role};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SELECT: &str = "SELECT id, user_id, delivery_crew_id, status, total, date, created_at FROM orders";

/// Which slice of the order table a caller may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    /// Manager/Admin: every order
    All,
    /// Customer: own orders
    Owner(i64),
    /// Delivery crew: orders assigned to them
    Crew(i64),
}

/// Convert the user's cart into an order.
///
/// All steps are atomic: snapshot the cart lines, insert the order with the
/// accumulated total, freeze one order item per line, then delete the cart
/// lines. A concurrent checkout by the same user observes an empty cart and
/// fails with [`RepoError::EmptyCart`].
pub async fn checkout(pool: &SqlitePool, user_id: i64) -> RepoResult<Order> {
    let mut tx = pool.begin().await?;

    let lines = sqlx::query_as::<_, CartLine>(
        "SELECT user_id, menu_item_id, quantity, unit_price, line_total FROM cart_line WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    if lines.is_empty() {
        return Err(RepoError::EmptyCart);
    }

    let order_id = snowflake_id();
    let total: i64 = lines.iter().map(|l| l.line_total).sum();
    let date = chrono::Utc::now().date_naive();
    let created_at = now_millis();

    sqlx::query(
        "INSERT INTO orders (id, user_id, delivery_crew_id, status, total, date, created_at) \
         VALUES (?1, ?2, NULL, 0, ?3, ?4, ?5)",
    )
    .bind(order_id)
    .bind(user_id)
    .bind(total)
    .bind(date)
    .bind(created_at)
    .execute(&mut *tx)
    .await?;

    for line in &lines {
        sqlx::query(
            "INSERT INTO order_item (order_id, menu_item_id, quantity, unit_price, line_total) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(order_id)
        .bind(line.menu_item_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.line_total)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("DELETE FROM cart_line WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        order_id = order_id,
        user_id = user_id,
        total_cents = total,
        lines = lines.len(),
        "Order placed"
    );

    find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// List orders visible within the scope, newest first.
pub async fn list_scoped(pool: &SqlitePool, scope: OrderScope) -> RepoResult<Vec<Order>> {
    const ORDER_BY: &str = " ORDER BY date DESC, created_at DESC";
    let orders = match scope {
        OrderScope::All => {
            sqlx::query_as::<_, Order>(&format!("{SELECT}{ORDER_BY}"))
                .fetch_all(pool)
                .await?
        }
        OrderScope::Owner(user_id) => {
            sqlx::query_as::<_, Order>(&format!("{SELECT} WHERE user_id = ?{ORDER_BY}"))
                .bind(user_id)
                .fetch_all(pool)
                .await?
        }
        OrderScope::Crew(crew_id) => {
            sqlx::query_as::<_, Order>(&format!("{SELECT} WHERE delivery_crew_id = ?{ORDER_BY}"))
                .bind(crew_id)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(orders)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Frozen items of an order, joined with the menu item titles.
pub async fn items_for(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItemDetail>> {
    let items = sqlx::query_as::<_, OrderItemDetail>(
        "SELECT oi.menu_item_id, mi.title, oi.quantity, oi.unit_price, oi.line_total \
         FROM order_item oi JOIN menu_item mi ON oi.menu_item_id = mi.id \
         WHERE oi.order_id = ? ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Manager update: status and/or delivery crew assignment.
///
/// An assigned delivery crew user must hold the delivery-crew role.
pub async fn update_fields(
    pool: &SqlitePool,
    id: i64,
    status: Option<bool>,
    delivery_crew_id: Option<i64>,
) -> RepoResult<Order> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))?;

    if let Some(crew_id) = delivery_crew_id {
        let is_crew: Option<i64> = sqlx::query_scalar(
            "SELECT user_id FROM user_role WHERE user_id = ? AND role = ?",
        )
        .bind(crew_id)
        .bind(Role::DeliveryCrew.as_str())
        .fetch_optional(pool)
        .await?;
        if is_crew.is_none() {
            return Err(RepoError::Validation(format!(
                "User {crew_id} is not in the delivery crew"
            )));
        }
    }

    sqlx::query(
        "UPDATE orders SET status = COALESCE(?1, status), delivery_crew_id = COALESCE(?2, delivery_crew_id) WHERE id = ?3",
    )
    .bind(status)
    .bind(delivery_crew_id)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Delivery-crew update: the status flag only.
pub async fn set_status(pool: &SqlitePool, id: i64, status: bool) -> RepoResult<Order> {
    let rows = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Delete an order; its items go with it (cascade).
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(true)
}
