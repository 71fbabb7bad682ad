//! Order Repository
//!
//! Orders and their items. An order item pack opens a fresh order and attaches
//! every item to it in one batch. Items are updated one at a time.

use std::sync::Arc;

use shared::models::{
    Order, OrderCreate, OrderItem, OrderItemPack, OrderItemPackCreated, OrderItemUpdate,
    OrderUpdate,
};
use shared::util::{now_millis, snowflake_id};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::{QueryContext, Store};
use crate::money;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            base: BaseRepository::new(store),
        }
    }

    pub async fn find_by_id(&self, ctx: &QueryContext, id: i64) -> RepoResult<Option<Order>> {
        let store = self.base.store();
        Ok(ctx.run(store.find_order(ctx, id)).await?)
    }

    pub async fn find_all(&self, ctx: &QueryContext) -> RepoResult<Vec<Order>> {
        let store = self.base.store();
        Ok(ctx.run(store.list_orders(ctx)).await?)
    }

    pub async fn find_item(&self, ctx: &QueryContext, id: i64) -> RepoResult<Option<OrderItem>> {
        let store = self.base.store();
        Ok(ctx.run(store.find_order_item(ctx, id)).await?)
    }

    /// Raw order items, optionally restricted to one order
    pub async fn find_items(
        &self,
        ctx: &QueryContext,
        order_id: Option<i64>,
    ) -> RepoResult<Vec<OrderItem>> {
        let store = self.base.store();
        Ok(ctx.run(store.find_order_items(ctx, order_id)).await?)
    }

    /// Create an order, checking the table when one is given
    pub async fn create(&self, ctx: &QueryContext, data: OrderCreate) -> RepoResult<Order> {
        if let Some(table_id) = data.table_id {
            self.require_table(ctx, table_id).await?;
        }

        let now = now_millis();
        let order = Order {
            id: snowflake_id(),
            table_id: data.table_id,
            order_date: data.order_date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };
        let store = self.base.store();
        ctx.run(store.insert_order(order.clone())).await?;
        tracing::info!(order_id = order.id, table_id = ?order.table_id, "Order created");
        Ok(order)
    }

    /// Update an order's table or date; absent fields keep their value
    pub async fn update(
        &self,
        ctx: &QueryContext,
        id: i64,
        data: OrderUpdate,
    ) -> RepoResult<Order> {
        let existing = self.find_by_id(ctx, id).await?.ok_or(RepoError::NotFound {
            resource: "order",
            id,
        })?;
        if let Some(table_id) = data.table_id {
            self.require_table(ctx, table_id).await?;
        }

        let order = Order {
            table_id: data.table_id.or(existing.table_id),
            order_date: data.order_date.unwrap_or(existing.order_date),
            updated_at: now_millis(),
            ..existing
        };
        let store = self.base.store();
        if !ctx.run(store.update_order(order.clone())).await? {
            return Err(RepoError::NotFound {
                resource: "order",
                id,
            });
        }
        tracing::info!(order_id = id, table_id = ?order.table_id, "Order updated");
        Ok(order)
    }

    /// Update one order item; quantity and price follow the creation rules
    pub async fn update_item(
        &self,
        ctx: &QueryContext,
        id: i64,
        data: OrderItemUpdate,
    ) -> RepoResult<OrderItem> {
        if let Some(quantity) = data.quantity {
            money::validate_quantity(quantity)?;
        }
        if let Some(unit_price) = data.unit_price {
            money::validate_price(unit_price, "unit_price")?;
        }
        let existing = self.find_item(ctx, id).await?.ok_or(RepoError::NotFound {
            resource: "order_item",
            id,
        })?;

        let item = OrderItem {
            food_id: data.food_id.unwrap_or(existing.food_id),
            quantity: data.quantity.unwrap_or(existing.quantity),
            unit_price: data
                .unit_price
                .map(money::round_price)
                .unwrap_or(existing.unit_price),
            updated_at: now_millis(),
            ..existing
        };
        let store = self.base.store();
        if !ctx.run(store.update_order_item(item.clone())).await? {
            return Err(RepoError::NotFound {
                resource: "order_item",
                id,
            });
        }
        tracing::info!(order_item_id = id, order_id = item.order_id, "Order item updated");
        Ok(item)
    }

    /// Open an order and insert every item of the pack against it
    ///
    /// All items are validated before anything is written. Food ids are not
    /// checked.
    pub async fn create_pack(
        &self,
        ctx: &QueryContext,
        pack: OrderItemPack,
    ) -> RepoResult<OrderItemPackCreated> {
        if pack.order_items.is_empty() {
            return Err(RepoError::Validation(
                "order_items must contain at least one item".to_string(),
            ));
        }
        for input in &pack.order_items {
            money::validate_quantity(input.quantity)?;
            money::validate_price(input.unit_price, "unit_price")?;
        }

        let order = self
            .create(
                ctx,
                OrderCreate {
                    table_id: pack.table_id,
                    order_date: None,
                },
            )
            .await?;

        let now = now_millis();
        let items: Vec<OrderItem> = pack
            .order_items
            .into_iter()
            .map(|input| OrderItem {
                id: snowflake_id(),
                order_id: order.id,
                food_id: input.food_id,
                quantity: input.quantity,
                unit_price: money::round_price(input.unit_price),
                created_at: now,
                updated_at: now,
            })
            .collect();

        let store = self.base.store();
        ctx.run(store.insert_order_items(items.clone())).await?;
        tracing::info!(order_id = order.id, items = items.len(), "Order item pack created");

        Ok(OrderItemPackCreated {
            order_id: order.id,
            order_items: items,
        })
    }

    async fn require_table(&self, ctx: &QueryContext, table_id: i64) -> RepoResult<()> {
        let store = self.base.store();
        match ctx.run(store.find_table(ctx, table_id)).await? {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound {
                resource: "table",
                id: table_id,
            }),
        }
    }
}
