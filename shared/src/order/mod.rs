//! Order view types
//!
//! Derived, never persisted structures produced by the order view engine:
//! - [`OrderItemLine`]: one order item after the food/order/table joins
//! - [`OrderSummary`]: the aggregate of one order/table group
//! - [`InvoiceView`]: an invoice merged with its order's summary

pub mod view;

// Re-exports
pub use view::{GroupingDiagnostic, InvoiceView, OrderItemLine, OrderSummary, PAYMENT_METHOD_UNSET};
