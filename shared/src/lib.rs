//! Shared types for the restro workspace
//!
//! Record models, derived order views, the unified error system and small
//! utilities used by the server and by API clients.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use order::{GroupingDiagnostic, InvoiceView, OrderItemLine, OrderSummary};
