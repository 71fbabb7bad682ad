//! Fixtures and fault-injecting stores for view engine tests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shared::models::{DiningTable, Food, Invoice, Order, OrderItem};

use tempfile::TempDir;

use crate::db::{
    DbService, MemoryStore, QueryContext, RecordStore, RecordWriter, SqliteStore, StoreError,
    StoreResult,
};

pub const FOOD_PIZZA: i64 = 1;
pub const FOOD_TIRAMISU: i64 = 2;
pub const TABLE_T1: i64 = 100;
pub const ORDER_O1: i64 = 200;
pub const INVOICE_I1: i64 = 400;

pub fn food(id: i64, name: &str, price: f64) -> Food {
    Food {
        id,
        name: name.to_string(),
        price,
        food_image: format!("/images/{id}.jpg"),
        created_at: 0,
        updated_at: 0,
    }
}

pub fn table(id: i64, table_number: i32) -> DiningTable {
    DiningTable {
        id,
        table_number,
        number_of_guests: 2,
        created_at: 0,
        updated_at: 0,
    }
}

pub fn order(id: i64, table_id: Option<i64>) -> Order {
    Order {
        id,
        table_id,
        order_date: 0,
        created_at: 0,
        updated_at: 0,
    }
}

pub fn item(id: i64, order_id: i64, food_id: i64, quantity: i32) -> OrderItem {
    OrderItem {
        id,
        order_id,
        food_id,
        quantity,
        unit_price: 0.0,
        created_at: 0,
        updated_at: 0,
    }
}

pub fn invoice(id: i64, order_id: i64) -> Invoice {
    Invoice {
        id,
        order_id,
        payment_method: None,
        payment_status: "PENDING".to_string(),
        payment_due_date: 86_400_000,
        created_at: 0,
        updated_at: 0,
    }
}

/// Table 5 with order O1 holding a 10.00 pizza and a 7.50 tiramisu, billed by
/// invoice I1 with no payment method
pub async fn seed_dinner_for_two<S: RecordWriter + ?Sized>(store: &S) {
    store.insert_food(food(FOOD_PIZZA, "Pizza", 10.0)).await.unwrap();
    store
        .insert_food(food(FOOD_TIRAMISU, "Tiramisu", 7.5))
        .await
        .unwrap();
    store.insert_table(table(TABLE_T1, 5)).await.unwrap();
    store
        .insert_order(order(ORDER_O1, Some(TABLE_T1)))
        .await
        .unwrap();
    store
        .insert_order_items(vec![
            item(301, ORDER_O1, FOOD_PIZZA, 2),
            item(302, ORDER_O1, FOOD_TIRAMISU, 1),
        ])
        .await
        .unwrap();
    store
        .insert_invoice(invoice(INVOICE_I1, ORDER_O1))
        .await
        .unwrap();
}

pub async fn dinner_for_two() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    seed_dinner_for_two(store.as_ref()).await;
    store
}

/// Empty SQLite store in a temporary directory
pub async fn sqlite_store() -> (TempDir, Arc<SqliteStore>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("views.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    (dir, Arc::new(SqliteStore::new(db)))
}

#[derive(Debug, Clone, Copy)]
pub enum Fault {
    /// Food lookups fail
    FailFoods,
    /// Invoice lookups fail
    FailInvoices,
    /// Table lookups hang for the given duration
    SlowTables(Duration),
    /// Order item scans ignore their filter
    IgnoreFilter,
}

/// Delegates to a [`MemoryStore`], injecting one fault
pub struct FaultyStore {
    inner: Arc<MemoryStore>,
    fault: Fault,
}

impl FaultyStore {
    pub fn new(inner: Arc<MemoryStore>, fault: Fault) -> Self {
        Self { inner, fault }
    }
}

#[async_trait]
impl RecordStore for FaultyStore {
    fn backend(&self) -> &'static str {
        "faulty"
    }

    async fn find_order_items(
        &self,
        ctx: &QueryContext,
        order_id: Option<i64>,
    ) -> StoreResult<Vec<OrderItem>> {
        let filter = match self.fault {
            Fault::IgnoreFilter => None,
            _ => order_id,
        };
        self.inner.find_order_items(ctx, filter).await
    }

    async fn find_foods(&self, ctx: &QueryContext, ids: &[i64]) -> StoreResult<Vec<Food>> {
        if let Fault::FailFoods = self.fault {
            return Err(StoreError::Unavailable("food collection offline".into()));
        }
        self.inner.find_foods(ctx, ids).await
    }

    async fn find_orders(&self, ctx: &QueryContext, ids: &[i64]) -> StoreResult<Vec<Order>> {
        self.inner.find_orders(ctx, ids).await
    }

    async fn find_tables(
        &self,
        ctx: &QueryContext,
        ids: &[i64],
    ) -> StoreResult<Vec<DiningTable>> {
        if let Fault::SlowTables(delay) = self.fault {
            tokio::time::sleep(delay).await;
        }
        self.inner.find_tables(ctx, ids).await
    }

    async fn find_food(&self, ctx: &QueryContext, id: i64) -> StoreResult<Option<Food>> {
        self.inner.find_food(ctx, id).await
    }

    async fn find_order(&self, ctx: &QueryContext, id: i64) -> StoreResult<Option<Order>> {
        self.inner.find_order(ctx, id).await
    }

    async fn find_table(&self, ctx: &QueryContext, id: i64) -> StoreResult<Option<DiningTable>> {
        self.inner.find_table(ctx, id).await
    }

    async fn find_table_by_number(
        &self,
        ctx: &QueryContext,
        table_number: i32,
    ) -> StoreResult<Option<DiningTable>> {
        self.inner.find_table_by_number(ctx, table_number).await
    }

    async fn find_order_item(
        &self,
        ctx: &QueryContext,
        id: i64,
    ) -> StoreResult<Option<OrderItem>> {
        self.inner.find_order_item(ctx, id).await
    }

    async fn find_invoice(&self, ctx: &QueryContext, id: i64) -> StoreResult<Option<Invoice>> {
        if let Fault::FailInvoices = self.fault {
            return Err(StoreError::Unavailable("invoice collection offline".into()));
        }
        self.inner.find_invoice(ctx, id).await
    }

    async fn list_tables(&self, ctx: &QueryContext) -> StoreResult<Vec<DiningTable>> {
        self.inner.list_tables(ctx).await
    }

    async fn list_orders(&self, ctx: &QueryContext) -> StoreResult<Vec<Order>> {
        self.inner.list_orders(ctx).await
    }

    async fn list_invoices(&self, ctx: &QueryContext) -> StoreResult<Vec<Invoice>> {
        self.inner.list_invoices(ctx).await
    }
}
