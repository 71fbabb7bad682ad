//! SQLite record store

use async_trait::async_trait;
use shared::models::{DiningTable, Food, Invoice, Order, OrderItem};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{RecordStore, RecordWriter, StoreError, StoreResult};
use crate::db::DbService;
use crate::db::context::QueryContext;

const FOOD_COLUMNS: &str = "id, name, price, food_image, created_at, updated_at";
const TABLE_COLUMNS: &str = "id, table_number, number_of_guests, created_at, updated_at";
const ORDER_COLUMNS: &str = "id, table_id, order_date, created_at, updated_at";
const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, food_id, quantity, unit_price, created_at, updated_at";
const INVOICE_COLUMNS: &str =
    "id, order_id, payment_method, payment_status, payment_due_date, created_at, updated_at";

/// Ids bound per `IN (...)` query, well under SQLite's variable limit
const IDS_PER_QUERY: usize = 500;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(db: DbService) -> Self {
        Self { pool: db.pool }
    }

    /// `SELECT <columns> FROM <table> WHERE id IN (...) ORDER BY id`
    ///
    /// Keys are sorted and split into chunks of [`IDS_PER_QUERY`], so the
    /// concatenated chunks stay in key order.
    async fn select_by_ids<T>(&self, columns: &str, table: &str, ids: &[i64]) -> StoreResult<Vec<T>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
    {
        let mut keys = ids.to_vec();
        keys.sort_unstable();
        keys.dedup();

        let mut rows = Vec::with_capacity(keys.len());
        for chunk in keys.chunks(IDS_PER_QUERY) {
            let mut qb: QueryBuilder<Sqlite> =
                QueryBuilder::new(format!("SELECT {columns} FROM {table} WHERE id IN ("));
            let mut separated = qb.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            separated.push_unseparated(") ORDER BY id");
            rows.extend(qb.build_query_as::<T>().fetch_all(&self.pool).await?);
        }
        Ok(rows)
    }
}

fn conflict_or_unavailable(err: sqlx::Error, collection: &'static str, id: i64) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict { collection, id }
        }
        _ => StoreError::from(err),
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn find_order_items(
        &self,
        _ctx: &QueryContext,
        order_id: Option<i64>,
    ) -> StoreResult<Vec<OrderItem>> {
        let rows = match order_id {
            Some(order_id) => {
                sqlx::query_as::<_, OrderItem>(&format!(
                    "SELECT {ORDER_ITEM_COLUMNS} FROM order_item WHERE order_id = ? ORDER BY id"
                ))
                .bind(order_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderItem>(&format!(
                    "SELECT {ORDER_ITEM_COLUMNS} FROM order_item ORDER BY id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn find_foods(&self, _ctx: &QueryContext, ids: &[i64]) -> StoreResult<Vec<Food>> {
        self.select_by_ids(FOOD_COLUMNS, "food", ids).await
    }

    async fn find_orders(&self, _ctx: &QueryContext, ids: &[i64]) -> StoreResult<Vec<Order>> {
        self.select_by_ids(ORDER_COLUMNS, "orders", ids).await
    }

    async fn find_tables(
        &self,
        _ctx: &QueryContext,
        ids: &[i64],
    ) -> StoreResult<Vec<DiningTable>> {
        self.select_by_ids(TABLE_COLUMNS, "dining_table", ids).await
    }

    async fn find_food(&self, _ctx: &QueryContext, id: i64) -> StoreResult<Option<Food>> {
        let row = sqlx::query_as::<_, Food>(&format!(
            "SELECT {FOOD_COLUMNS} FROM food WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_order(&self, _ctx: &QueryContext, id: i64) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_table(&self, _ctx: &QueryContext, id: i64) -> StoreResult<Option<DiningTable>> {
        let row = sqlx::query_as::<_, DiningTable>(&format!(
            "SELECT {TABLE_COLUMNS} FROM dining_table WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_table_by_number(
        &self,
        _ctx: &QueryContext,
        table_number: i32,
    ) -> StoreResult<Option<DiningTable>> {
        let row = sqlx::query_as::<_, DiningTable>(&format!(
            "SELECT {TABLE_COLUMNS} FROM dining_table WHERE table_number = ? LIMIT 1"
        ))
        .bind(table_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_order_item(
        &self,
        _ctx: &QueryContext,
        id: i64,
    ) -> StoreResult<Option<OrderItem>> {
        let row = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_item WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_invoice(&self, _ctx: &QueryContext, id: i64) -> StoreResult<Option<Invoice>> {
        let row = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoice WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_tables(&self, _ctx: &QueryContext) -> StoreResult<Vec<DiningTable>> {
        let rows = sqlx::query_as::<_, DiningTable>(&format!(
            "SELECT {TABLE_COLUMNS} FROM dining_table ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_orders(&self, _ctx: &QueryContext) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_invoices(&self, _ctx: &QueryContext) -> StoreResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoice ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl RecordWriter for SqliteStore {
    async fn insert_food(&self, food: Food) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO food (id, name, price, food_image, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(food.id)
        .bind(&food.name)
        .bind(food.price)
        .bind(&food.food_image)
        .bind(food.created_at)
        .bind(food.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_unavailable(e, "food", food.id))?;
        Ok(())
    }

    async fn insert_table(&self, table: DiningTable) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO dining_table (id, table_number, number_of_guests, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(table.id)
        .bind(table.table_number)
        .bind(table.number_of_guests)
        .bind(table.created_at)
        .bind(table.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_unavailable(e, "dining_table", table.id))?;
        Ok(())
    }

    async fn insert_order(&self, order: Order) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO orders (id, table_id, order_date, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(order.id)
        .bind(order.table_id)
        .bind(order.order_date)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_unavailable(e, "order", order.id))?;
        Ok(())
    }

    async fn insert_order_items(&self, items: Vec<OrderItem>) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for item in &items {
            sqlx::query(
                "INSERT INTO order_item (id, order_id, food_id, quantity, unit_price, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(item.id)
            .bind(item.order_id)
            .bind(item.food_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.created_at)
            .bind(item.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_or_unavailable(e, "order_item", item.id))?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn insert_invoice(&self, invoice: Invoice) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO invoice (id, order_id, payment_method, payment_status, payment_due_date, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(invoice.id)
        .bind(invoice.order_id)
        .bind(&invoice.payment_method)
        .bind(&invoice.payment_status)
        .bind(invoice.payment_due_date)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_unavailable(e, "invoice", invoice.id))?;
        Ok(())
    }

    async fn update_table(&self, table: DiningTable) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE dining_table SET table_number = ?, number_of_guests = ?, updated_at = ? WHERE id = ?",
        )
        .bind(table.table_number)
        .bind(table.number_of_guests)
        .bind(table.updated_at)
        .bind(table.id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_unavailable(e, "dining_table", table.id))?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_order(&self, order: Order) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE orders SET table_id = ?, order_date = ?, updated_at = ? WHERE id = ?",
        )
        .bind(order.table_id)
        .bind(order.order_date)
        .bind(order.updated_at)
        .bind(order.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_order_item(&self, item: OrderItem) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE order_item SET food_id = ?, quantity = ?, unit_price = ?, updated_at = ? WHERE id = ?",
        )
        .bind(item.food_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.updated_at)
        .bind(item.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_invoice(&self, invoice: Invoice) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE invoice SET payment_method = ?, payment_status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&invoice.payment_method)
        .bind(&invoice.payment_status)
        .bind(invoice.updated_at)
        .bind(invoice.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
