//! Record Store
//!
//! The persistence boundary the order view engine reads from: independently
//! keyed collections (`food`, `dining_table`, `order`, `order_item`,
//! `invoice`) offering scans and point lookups, but no joins.
//!
//! - [`RecordStore`]: read side used by the view engine
//! - [`RecordWriter`]: insert and update side used by the write handlers
//! - [`MemoryStore`]: in-process store
//! - [`SqliteStore`]: SQLite store backed by [`DbService`](super::DbService)

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use shared::models::{DiningTable, Food, Invoice, Order, OrderItem};
use thiserror::Error;

use super::context::QueryContext;

/// Store error types
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Duplicate key in {collection}: {id}")]
    Conflict { collection: &'static str, id: i64 },

    #[error("Query canceled")]
    Canceled,

    #[error("Query deadline exceeded")]
    DeadlineExceeded,
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Read interface of the record store
///
/// Multi-key lookups return the records that exist, in key order; missing
/// keys are simply absent from the result.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Scan order items, restricted to one order when `order_id` is given
    async fn find_order_items(
        &self,
        ctx: &QueryContext,
        order_id: Option<i64>,
    ) -> StoreResult<Vec<OrderItem>>;

    async fn find_foods(&self, ctx: &QueryContext, ids: &[i64]) -> StoreResult<Vec<Food>>;

    async fn find_orders(&self, ctx: &QueryContext, ids: &[i64]) -> StoreResult<Vec<Order>>;

    async fn find_tables(&self, ctx: &QueryContext, ids: &[i64])
    -> StoreResult<Vec<DiningTable>>;

    async fn find_food(&self, ctx: &QueryContext, id: i64) -> StoreResult<Option<Food>>;

    async fn find_order(&self, ctx: &QueryContext, id: i64) -> StoreResult<Option<Order>>;

    async fn find_table(&self, ctx: &QueryContext, id: i64) -> StoreResult<Option<DiningTable>>;

    async fn find_table_by_number(
        &self,
        ctx: &QueryContext,
        table_number: i32,
    ) -> StoreResult<Option<DiningTable>>;

    async fn find_order_item(&self, ctx: &QueryContext, id: i64)
    -> StoreResult<Option<OrderItem>>;

    async fn find_invoice(&self, ctx: &QueryContext, id: i64) -> StoreResult<Option<Invoice>>;

    async fn list_tables(&self, ctx: &QueryContext) -> StoreResult<Vec<DiningTable>>;

    async fn list_orders(&self, ctx: &QueryContext) -> StoreResult<Vec<Order>>;

    async fn list_invoices(&self, ctx: &QueryContext) -> StoreResult<Vec<Invoice>>;
}

/// Write interface of the record store
///
/// `update_*` replaces the stored record with the same id and returns
/// `false` when there is none. Table numbers are unique: inserting or
/// updating a table onto a number already held by another table is a
/// [`StoreError::Conflict`].
#[async_trait]
pub trait RecordWriter: Send + Sync {
    async fn insert_food(&self, food: Food) -> StoreResult<()>;

    async fn insert_table(&self, table: DiningTable) -> StoreResult<()>;

    async fn insert_order(&self, order: Order) -> StoreResult<()>;

    /// Insert a batch of items; either all of them land or none do
    async fn insert_order_items(&self, items: Vec<OrderItem>) -> StoreResult<()>;

    async fn insert_invoice(&self, invoice: Invoice) -> StoreResult<()>;

    async fn update_table(&self, table: DiningTable) -> StoreResult<bool>;

    async fn update_order(&self, order: Order) -> StoreResult<bool>;

    async fn update_order_item(&self, item: OrderItem) -> StoreResult<bool>;

    async fn update_invoice(&self, invoice: Invoice) -> StoreResult<bool>;
}

/// Full store: read + write
pub trait Store: RecordStore + RecordWriter {}

impl<T: RecordStore + RecordWriter> Store for T {}

/// Distinct values in first-seen order
pub(crate) fn distinct<I>(values: I) -> Vec<i64>
where
    I: IntoIterator<Item = i64>,
{
    let mut seen = std::collections::HashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).collect()
}
