//! Order Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::money;

/// Order entity
///
/// Created atomically from a non-empty cart; `total` and `date` are
/// server-computed and never recomputed after placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Owner (immutable)
    pub user_id: i64,
    /// Assigned delivery crew member, if any
    pub delivery_crew_id: Option<i64>,
    /// false = placed, true = delivered
    pub status: bool,
    /// Sum of the order items' line totals, in cents
    pub total: i64,
    /// Creation date
    pub date: NaiveDate,
    pub created_at: i64,
}

/// Order item: frozen record of one line at placement time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i64,
    /// Price snapshot in cents, decoupled from later menu price changes
    pub unit_price: i64,
    pub line_total: i64,
}

/// Order item joined with the menu item title (detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemDetail {
    pub menu_item_id: i64,
    pub title: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub line_total: i64,
}

/// Order summary as served on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: i64,
    pub user_id: i64,
    pub delivery_crew_id: Option<i64>,
    pub status: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub date: NaiveDate,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            delivery_crew_id: order.delivery_crew_id,
            status: order.status,
            total: money::to_decimal(order.total),
            date: order.date,
        }
    }
}

/// Order item as served on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemResponse {
    pub menu_item_id: i64,
    pub title: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
}

impl From<OrderItemDetail> for OrderItemResponse {
    fn from(item: OrderItemDetail) -> Self {
        Self {
            menu_item_id: item.menu_item_id,
            title: item.title,
            quantity: item.quantity,
            unit_price: money::to_decimal(item.unit_price),
            line_total: money::to_decimal(item.line_total),
        }
    }
}

/// Order with its items (detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetailResponse {
    pub id: i64,
    pub user_id: i64,
    pub delivery_crew_id: Option<i64>,
    pub status: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub date: NaiveDate,
    pub items: Vec<OrderItemResponse>,
}

impl OrderDetailResponse {
    pub fn new(order: Order, items: Vec<OrderItemDetail>) -> Self {
        let summary = OrderResponse::from(order);
        Self {
            id: summary.id,
            user_id: summary.user_id,
            delivery_crew_id: summary.delivery_crew_id,
            status: summary.status,
            total: summary.total,
            date: summary.date,
            items: items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

/// Checkout result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Order status literal: accepts JSON booleans and the integers 0/1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusFlag(pub bool);

impl<'de> Deserialize<'de> for StatusFlag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Bool(b) => Ok(StatusFlag(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(StatusFlag(false)),
                Some(1) => Ok(StatusFlag(true)),
                _ => Err(D::Error::custom("status must be a boolean or 0/1")),
            },
            _ => Err(D::Error::custom("status must be a boolean or 0/1")),
        }
    }
}

/// Manager/Admin order update payload (full or partial)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub status: Option<StatusFlag>,
    pub delivery_crew_id: Option<i64>,
}

/// Delivery-crew order update payload: exactly the status field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusPatch {
    pub status: StatusFlag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_flag_accepts_bool_and_binary_integers() {
        let f: StatusFlag = serde_json::from_str("true").unwrap();
        assert!(f.0);
        let f: StatusFlag = serde_json::from_str("0").unwrap();
        assert!(!f.0);
        let f: StatusFlag = serde_json::from_str("1").unwrap();
        assert!(f.0);
    }

    #[test]
    fn status_flag_rejects_other_values() {
        assert!(serde_json::from_str::<StatusFlag>("2").is_err());
        assert!(serde_json::from_str::<StatusFlag>("\"yes\"").is_err());
        assert!(serde_json::from_str::<StatusFlag>("null").is_err());
    }

    #[test]
    fn status_patch_rejects_extra_fields() {
        let ok: Result<StatusPatch, _> = serde_json::from_str(r#"{"status": 1}"#);
        assert!(ok.unwrap().status.0);

        let extra: Result<StatusPatch, _> =
            serde_json::from_str(r#"{"status": 1, "total": 50}"#);
        assert!(extra.is_err());

        let missing: Result<StatusPatch, _> = serde_json::from_str(r#"{}"#);
        assert!(missing.is_err());
    }
}
