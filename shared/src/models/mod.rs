//! Data models
//!
//! Shared between restro-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps are epoch milliseconds.

pub mod dining_table;
pub mod food;
pub mod invoice;
pub mod order;
pub mod order_item;

// Re-exports
pub use dining_table::*;
pub use food::*;
pub use invoice::*;
pub use order::*;
pub use order_item::*;
