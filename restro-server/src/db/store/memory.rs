//! In-memory record store
//!
//! Each collection is a `BTreeMap` keyed by id behind its own lock, so scans
//! come back in key order and readers only ever see whole records. There is
//! no cross-collection snapshot: two lookups in one computation may observe
//! different states if a writer runs in between.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{DiningTable, Food, Invoice, Order, OrderItem};

use super::{RecordStore, RecordWriter, StoreError, StoreResult};
use crate::db::context::QueryContext;

#[derive(Debug, Default)]
pub struct MemoryStore {
    foods: RwLock<BTreeMap<i64, Food>>,
    tables: RwLock<BTreeMap<i64, DiningTable>>,
    orders: RwLock<BTreeMap<i64, Order>>,
    order_items: RwLock<BTreeMap<i64, OrderItem>>,
    invoices: RwLock<BTreeMap<i64, Invoice>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove an order header, leaving its items dangling
    pub fn remove_order(&self, id: i64) -> Option<Order> {
        self.orders.write().remove(&id)
    }

    /// Remove a food, leaving items that reference it dangling
    pub fn remove_food(&self, id: i64) -> Option<Food> {
        self.foods.write().remove(&id)
    }
}

fn pick<T: Clone>(map: &BTreeMap<i64, T>, ids: &[i64]) -> Vec<T> {
    let mut keys: Vec<i64> = ids.to_vec();
    keys.sort_unstable();
    keys.dedup();
    keys.iter().filter_map(|id| map.get(id).cloned()).collect()
}

fn insert_unique<T>(
    map: &RwLock<BTreeMap<i64, T>>,
    collection: &'static str,
    id: i64,
    record: T,
) -> StoreResult<()> {
    let mut guard = map.write();
    if guard.contains_key(&id) {
        return Err(StoreError::Conflict { collection, id });
    }
    guard.insert(id, record);
    Ok(())
}

fn replace_existing<T>(map: &RwLock<BTreeMap<i64, T>>, id: i64, record: T) -> bool {
    match map.write().get_mut(&id) {
        Some(slot) => {
            *slot = record;
            true
        }
        None => false,
    }
}

fn number_taken(tables: &BTreeMap<i64, DiningTable>, table: &DiningTable) -> bool {
    tables
        .values()
        .any(|t| t.table_number == table.table_number && t.id != table.id)
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_order_items(
        &self,
        ctx: &QueryContext,
        order_id: Option<i64>,
    ) -> StoreResult<Vec<OrderItem>> {
        ctx.check()?;
        let items = self.order_items.read();
        Ok(items
            .values()
            .filter(|item| order_id.is_none_or(|id| item.order_id == id))
            .cloned()
            .collect())
    }

    async fn find_foods(&self, ctx: &QueryContext, ids: &[i64]) -> StoreResult<Vec<Food>> {
        ctx.check()?;
        Ok(pick(&*self.foods.read(), ids))
    }

    async fn find_orders(&self, ctx: &QueryContext, ids: &[i64]) -> StoreResult<Vec<Order>> {
        ctx.check()?;
        Ok(pick(&*self.orders.read(), ids))
    }

    async fn find_tables(
        &self,
        ctx: &QueryContext,
        ids: &[i64],
    ) -> StoreResult<Vec<DiningTable>> {
        ctx.check()?;
        Ok(pick(&*self.tables.read(), ids))
    }

    async fn find_food(&self, ctx: &QueryContext, id: i64) -> StoreResult<Option<Food>> {
        ctx.check()?;
        Ok(self.foods.read().get(&id).cloned())
    }

    async fn find_order(&self, ctx: &QueryContext, id: i64) -> StoreResult<Option<Order>> {
        ctx.check()?;
        Ok(self.orders.read().get(&id).cloned())
    }

    async fn find_table(&self, ctx: &QueryContext, id: i64) -> StoreResult<Option<DiningTable>> {
        ctx.check()?;
        Ok(self.tables.read().get(&id).cloned())
    }

    async fn find_table_by_number(
        &self,
        ctx: &QueryContext,
        table_number: i32,
    ) -> StoreResult<Option<DiningTable>> {
        ctx.check()?;
        Ok(self
            .tables
            .read()
            .values()
            .find(|t| t.table_number == table_number)
            .cloned())
    }

    async fn find_order_item(
        &self,
        ctx: &QueryContext,
        id: i64,
    ) -> StoreResult<Option<OrderItem>> {
        ctx.check()?;
        Ok(self.order_items.read().get(&id).cloned())
    }

    async fn find_invoice(&self, ctx: &QueryContext, id: i64) -> StoreResult<Option<Invoice>> {
        ctx.check()?;
        Ok(self.invoices.read().get(&id).cloned())
    }

    async fn list_tables(&self, ctx: &QueryContext) -> StoreResult<Vec<DiningTable>> {
        ctx.check()?;
        Ok(self.tables.read().values().cloned().collect())
    }

    async fn list_orders(&self, ctx: &QueryContext) -> StoreResult<Vec<Order>> {
        ctx.check()?;
        Ok(self.orders.read().values().cloned().collect())
    }

    async fn list_invoices(&self, ctx: &QueryContext) -> StoreResult<Vec<Invoice>> {
        ctx.check()?;
        Ok(self.invoices.read().values().cloned().collect())
    }
}

#[async_trait]
impl RecordWriter for MemoryStore {
    async fn insert_food(&self, food: Food) -> StoreResult<()> {
        insert_unique(&self.foods, "food", food.id, food)
    }

    async fn insert_table(&self, table: DiningTable) -> StoreResult<()> {
        // Number check and insert under one write lock
        let mut guard = self.tables.write();
        if guard.contains_key(&table.id) || number_taken(&guard, &table) {
            return Err(StoreError::Conflict {
                collection: "dining_table",
                id: table.id,
            });
        }
        guard.insert(table.id, table);
        Ok(())
    }

    async fn insert_order(&self, order: Order) -> StoreResult<()> {
        insert_unique(&self.orders, "order", order.id, order)
    }

    async fn insert_order_items(&self, items: Vec<OrderItem>) -> StoreResult<()> {
        let mut guard = self.order_items.write();
        let mut batch = BTreeMap::new();
        for item in items {
            if guard.contains_key(&item.id) || batch.contains_key(&item.id) {
                return Err(StoreError::Conflict {
                    collection: "order_item",
                    id: item.id,
                });
            }
            batch.insert(item.id, item);
        }
        guard.extend(batch);
        Ok(())
    }

    async fn insert_invoice(&self, invoice: Invoice) -> StoreResult<()> {
        insert_unique(&self.invoices, "invoice", invoice.id, invoice)
    }

    async fn update_table(&self, table: DiningTable) -> StoreResult<bool> {
        let mut guard = self.tables.write();
        if !guard.contains_key(&table.id) {
            return Ok(false);
        }
        if number_taken(&guard, &table) {
            return Err(StoreError::Conflict {
                collection: "dining_table",
                id: table.id,
            });
        }
        guard.insert(table.id, table);
        Ok(true)
    }

    async fn update_order(&self, order: Order) -> StoreResult<bool> {
        Ok(replace_existing(&self.orders, order.id, order))
    }

    async fn update_order_item(&self, item: OrderItem) -> StoreResult<bool> {
        Ok(replace_existing(&self.order_items, item.id, item))
    }

    async fn update_invoice(&self, invoice: Invoice) -> StoreResult<bool> {
        Ok(replace_existing(&self.invoices, invoice.id, invoice))
    }
}
