//! Order Model

use serde::{Deserialize, Serialize};

/// Order header. Line items live in their own collection and reference the
/// order by `order_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Table reference; an order may be placed before a table is assigned
    pub table_id: Option<i64>,
    pub order_date: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_id: Option<i64>,
    pub order_date: Option<i64>,
}

/// Update order payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub table_id: Option<i64>,
    pub order_date: Option<i64>,
}
