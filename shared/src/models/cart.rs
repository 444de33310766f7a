//! Cart Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money;

/// Cart line row: one (user, menu item) pairing with a price snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartLine {
    pub user_id: i64,
    pub menu_item_id: i64,
    pub quantity: i64,
    /// Menu item price in cents at the time of the last add
    pub unit_price: i64,
    /// Always `unit_price * quantity`
    pub line_total: i64,
}

/// Cart line joined with the menu item title (list view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartLineDetail {
    pub menu_item_id: i64,
    pub title: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub line_total: i64,
}

/// Cart line as served on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineResponse {
    pub menu_item_id: i64,
    pub title: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
}

impl From<CartLineDetail> for CartLineResponse {
    fn from(line: CartLineDetail) -> Self {
        Self {
            menu_item_id: line.menu_item_id,
            title: line.title,
            quantity: line.quantity,
            unit_price: money::to_decimal(line.unit_price),
            line_total: money::to_decimal(line.line_total),
        }
    }
}

/// Add-to-cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAdd {
    pub menu_item_id: i64,
    pub quantity: i64,
}
