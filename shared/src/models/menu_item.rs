//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money;

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub title: String,
    /// Price in cents
    pub price: i64,
    pub featured: bool,
    /// Category reference (required)
    pub category_id: i64,
}

/// Menu item as served on the wire (price as a two-decimal amount)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemResponse {
    pub id: i64,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub featured: bool,
    pub category_id: i64,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            price: money::to_decimal(item.price),
            featured: item.featured,
            category_id: item.category_id,
        }
    }
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub title: String,
    pub price: Decimal,
    pub featured: Option<bool>,
    pub category_id: i64,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub featured: Option<bool>,
    pub category_id: Option<i64>,
}
