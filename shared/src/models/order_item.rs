//! Order Item Model

use serde::{Deserialize, Serialize};

/// Order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub food_id: i64,
    pub quantity: i32,
    /// Rounded to 2 decimals whenever it is written
    pub unit_price: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One line of an order item pack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub food_id: i64,
    pub quantity: i32,
    pub unit_price: f64,
}

/// Update order item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemUpdate {
    pub food_id: Option<i64>,
    pub quantity: Option<i32>,
    pub unit_price: Option<f64>,
}

/// Create payload for a new order together with its items
///
/// A fresh order is opened (optionally at `table_id`) and every item is
/// attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemPack {
    pub table_id: Option<i64>,
    pub order_items: Vec<OrderItemInput>,
}

/// Result of creating an order item pack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemPackCreated {
    pub order_id: i64,
    pub order_items: Vec<OrderItem>,
}
