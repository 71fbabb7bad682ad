//! Invoice Model

use serde::{Deserialize, Serialize};

/// Payment status assigned when the client does not provide one
pub const PAYMENT_STATUS_PENDING: &str = "PENDING";

/// Accepted payment methods
pub const PAYMENT_METHODS: &[&str] = &["CARD", "CASH"];

/// Invoice entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i64,
    pub order_id: i64,
    pub payment_method: Option<String>,
    pub payment_status: String,
    /// Fixed at creation (creation time + 1 day)
    pub payment_due_date: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create invoice payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceCreate {
    pub order_id: i64,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
}

/// Update invoice payload
///
/// `order_id` and `payment_due_date` are fixed once the invoice exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
}
