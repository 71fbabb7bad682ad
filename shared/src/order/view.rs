//! Order view structures

use serde::{Deserialize, Serialize};

/// Literal shown for `payment_method` when an invoice has none
pub const PAYMENT_METHOD_UNSET: &str = "null";

/// One order item row after left-joining food, order and table
///
/// Joined fields are `None` (and omitted from JSON) when the referenced record
/// does not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemLine {
    pub order_item_id: i64,
    /// Amount this row contributes to `payment_due`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
    /// Id of the joined order (absent when the order record is missing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    pub quantity: i32,
}

/// Aggregate of all order item rows sharing `(order_id, table_id, table_number)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i32>,
    pub payment_due: f64,
    pub total_count: u32,
    pub order_items: Vec<OrderItemLine>,
}

impl OrderSummary {
    /// Group key of this summary
    pub fn key(&self) -> (Option<i64>, Option<i64>, Option<i32>) {
        (self.order_id, self.table_id, self.table_number)
    }
}

/// Recorded when an invoice's order resolved to more than one summary group
/// and the first group was used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingDiagnostic {
    pub group_count: usize,
}

/// Invoice ready for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceView {
    pub invoice_id: i64,
    /// Stored method, or the literal `"null"` when unset
    pub payment_method: String,
    pub order_id: i64,
    pub payment_status: String,
    pub payment_due: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i32>,
    pub payment_due_date: i64,
    pub order_items: Vec<OrderItemLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping: Option<GroupingDiagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(order_item_id: i64) -> OrderItemLine {
        OrderItemLine {
            order_item_id,
            amount: None,
            food_name: None,
            food_image: None,
            table_number: None,
            table_id: None,
            order_id: None,
            quantity: 1,
        }
    }

    #[test]
    fn test_absent_join_fields_are_omitted() {
        let json = serde_json::to_value(line(9)).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["order_item_id"], 9);
        assert_eq!(obj["quantity"], 1);
    }

    #[test]
    fn test_absent_join_fields_deserialize_as_none() {
        let parsed: OrderItemLine =
            serde_json::from_str(r#"{"order_item_id":3,"quantity":1,"amount":7.5}"#).unwrap();
        assert_eq!(parsed.amount, Some(7.5));
        assert!(parsed.food_name.is_none());
        assert!(parsed.order_id.is_none());
    }

    #[test]
    fn test_summary_key() {
        let summary = OrderSummary {
            order_id: Some(1),
            table_id: Some(2),
            table_number: Some(5),
            payment_due: 0.0,
            total_count: 0,
            order_items: vec![],
        };
        assert_eq!(summary.key(), (Some(1), Some(2), Some(5)));
    }
}
