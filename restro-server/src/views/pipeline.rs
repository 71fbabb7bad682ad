//! Join-aggregate pipeline
//!
//! Order items are left-joined with food (by `food_id`), order (by
//! `order_id`) and table (by the joined order's `table_id`), then grouped by
//! `(order_id, table_id, table_number)`. Missing referenced records leave the
//! joined fields empty; they never drop a row.

use std::collections::HashMap;
use std::sync::Arc;

use shared::models::{DiningTable, Food, Order, OrderItem};
use shared::order::{OrderItemLine, OrderSummary};
use tracing::{debug, instrument};

use super::AmountPolicy;
use super::error::ViewResult;
use crate::db::store::distinct;
use crate::db::{QueryContext, RecordStore};
use crate::money;

/// Computes order summaries from the record store
#[derive(Clone)]
pub struct OrderViewPipeline {
    store: Arc<dyn RecordStore>,
    amount_policy: AmountPolicy,
}

impl OrderViewPipeline {
    pub fn new(store: Arc<dyn RecordStore>, amount_policy: AmountPolicy) -> Self {
        Self {
            store,
            amount_policy,
        }
    }

    /// Summaries of every order, or of one order when `filter` is given
    ///
    /// Groups come out in the order their first item appears in the order
    /// item scan. Any failed lookup aborts the whole computation.
    #[instrument(skip(self, ctx), fields(policy = %self.amount_policy))]
    pub async fn compute_order_summaries(
        &self,
        filter: Option<i64>,
        ctx: &QueryContext,
    ) -> ViewResult<Vec<OrderSummary>> {
        let items = ctx.run(self.store.find_order_items(ctx, filter)).await?;
        if items.is_empty() {
            debug!("No order items matched");
            return Ok(Vec::new());
        }

        let food_ids = distinct(items.iter().map(|i| i.food_id));
        let order_ids = distinct(items.iter().map(|i| i.order_id));

        // Food and order lookups are independent
        let (foods, orders) = tokio::try_join!(
            ctx.run(self.store.find_foods(ctx, &food_ids)),
            ctx.run(self.store.find_orders(ctx, &order_ids)),
        )?;
        let foods: HashMap<i64, Food> = foods.into_iter().map(|f| (f.id, f)).collect();
        let orders: HashMap<i64, Order> = orders.into_iter().map(|o| (o.id, o)).collect();

        let table_ids = distinct(
            items
                .iter()
                .filter_map(|i| orders.get(&i.order_id))
                .filter_map(|o| o.table_id),
        );
        let tables: HashMap<i64, DiningTable> = if table_ids.is_empty() {
            HashMap::new()
        } else {
            ctx.run(self.store.find_tables(ctx, &table_ids))
                .await?
                .into_iter()
                .map(|t| (t.id, t))
                .collect()
        };
        ctx.check()?;

        let rows = join_rows(&items, &foods, &orders, &tables, self.amount_policy);
        let summaries = group_rows(rows);

        debug!(
            items = items.len(),
            foods = foods.len(),
            orders = orders.len(),
            tables = tables.len(),
            groups = summaries.len(),
            "Order summaries computed"
        );
        Ok(summaries)
    }
}

/// Left-outer join of order items with their food, order and table
pub fn join_rows(
    items: &[OrderItem],
    foods: &HashMap<i64, Food>,
    orders: &HashMap<i64, Order>,
    tables: &HashMap<i64, DiningTable>,
    policy: AmountPolicy,
) -> Vec<OrderItemLine> {
    items
        .iter()
        .map(|item| {
            let food = foods.get(&item.food_id);
            let order = orders.get(&item.order_id);
            let table = order
                .and_then(|o| o.table_id)
                .and_then(|table_id| tables.get(&table_id));

            let quantity = match policy {
                AmountPolicy::UnitPrice => 1,
                AmountPolicy::Extended => item.quantity,
            };

            OrderItemLine {
                order_item_id: item.id,
                amount: money::line_amount(food.map(|f| f.price), item.quantity, policy),
                food_name: food.map(|f| f.name.clone()),
                food_image: food.map(|f| f.food_image.clone()),
                table_number: table.map(|t| t.table_number),
                table_id: table.map(|t| t.id),
                order_id: order.map(|o| o.id),
                quantity,
            }
        })
        .collect()
}

/// Group joined rows by `(order_id, table_id, table_number)`
///
/// Absent amounts count as zero toward `payment_due`.
pub fn group_rows(rows: Vec<OrderItemLine>) -> Vec<OrderSummary> {
    let mut index: HashMap<(Option<i64>, Option<i64>, Option<i32>), usize> = HashMap::new();
    let mut groups: Vec<Vec<OrderItemLine>> = Vec::new();

    for row in rows {
        let key = (row.order_id, row.table_id, row.table_number);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(row);
    }

    groups
        .into_iter()
        .map(|rows| {
            let (order_id, table_id, table_number) = rows
                .first()
                .map(|r| (r.order_id, r.table_id, r.table_number))
                .unwrap_or_default();
            OrderSummary {
                order_id,
                table_id,
                table_number,
                payment_due: money::sum_amounts(rows.iter().map(|r| r.amount)),
                total_count: u32::try_from(rows.len()).unwrap_or(u32::MAX),
                order_items: rows,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, RecordWriter, StoreError};
    use crate::views::ViewError;
    use crate::views::test_support::*;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn pipeline(store: Arc<MemoryStore>) -> OrderViewPipeline {
        OrderViewPipeline::new(store, AmountPolicy::UnitPrice)
    }

    #[tokio::test]
    async fn test_dinner_for_two_summary() {
        let store = dinner_for_two().await;
        let ctx = QueryContext::background();

        let summaries = pipeline(store)
            .compute_order_summaries(Some(ORDER_O1), &ctx)
            .await
            .unwrap();

        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.payment_due, 17.5);
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.table_number, Some(5));
        assert_eq!(summary.table_id, Some(TABLE_T1));
        assert_eq!(summary.order_id, Some(ORDER_O1));

        let names: Vec<_> = summary
            .order_items
            .iter()
            .map(|l| l.food_name.as_deref())
            .collect();
        assert_eq!(names, vec![Some("Pizza"), Some("Tiramisu")]);
        assert!(summary.order_items.iter().all(|l| l.quantity == 1));
        assert_eq!(summary.order_items[0].amount, Some(10.0));
        assert_eq!(
            summary.order_items[1].food_image.as_deref(),
            Some("/images/2.jpg")
        );
    }

    #[tokio::test]
    async fn test_groups_follow_first_appearance() {
        let store = dinner_for_two().await;
        store.insert_order(order(201, None)).await.unwrap();
        // Lower item id: scanned before the O1 items
        store
            .insert_order_items(vec![item(10, 201, FOOD_TIRAMISU, 1)])
            .await
            .unwrap();

        let summaries = pipeline(store)
            .compute_order_summaries(None, &QueryContext::background())
            .await
            .unwrap();

        let keys: Vec<_> = summaries.iter().map(|s| s.order_id).collect();
        assert_eq!(keys, vec![Some(201), Some(ORDER_O1)]);
        assert_eq!(summaries[0].payment_due, 7.5);
        assert_eq!(summaries[1].payment_due, 17.5);
    }

    #[tokio::test]
    async fn test_missing_food_counts_as_zero() {
        let store = dinner_for_two().await;
        store.remove_food(FOOD_TIRAMISU);

        let summaries = pipeline(store)
            .compute_order_summaries(Some(ORDER_O1), &QueryContext::background())
            .await
            .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].payment_due, 10.0);
        assert_eq!(summaries[0].total_count, 2);
        let orphan = &summaries[0].order_items[1];
        assert_eq!(orphan.order_item_id, 302);
        assert_eq!(orphan.amount, None);
        assert_eq!(orphan.food_name, None);
    }

    #[tokio::test]
    async fn test_order_without_table() {
        let store = Arc::new(MemoryStore::new());
        store.insert_food(food(1, "Soup", 4.25)).await.unwrap();
        store.insert_order(order(7, None)).await.unwrap();
        store
            .insert_order_items(vec![item(1, 7, 1, 1), item(2, 7, 1, 1)])
            .await
            .unwrap();

        let summaries = pipeline(store)
            .compute_order_summaries(Some(7), &QueryContext::background())
            .await
            .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].table_number, None);
        assert_eq!(summaries[0].table_id, None);
        assert_eq!(summaries[0].order_id, Some(7));
        assert_eq!(summaries[0].payment_due, 8.5);
        assert!(summaries[0].order_items.iter().all(|l| l.table_number.is_none()));
    }

    #[tokio::test]
    async fn test_dangling_table_reference() {
        let store = Arc::new(MemoryStore::new());
        store.insert_food(food(1, "Soup", 4.25)).await.unwrap();
        store.insert_order(order(7, Some(999))).await.unwrap();
        store
            .insert_order_items(vec![item(1, 7, 1, 1)])
            .await
            .unwrap();

        let summaries = pipeline(store)
            .compute_order_summaries(None, &QueryContext::background())
            .await
            .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].key(), (Some(7), None, None));
        assert_eq!(summaries[0].total_count, 1);
        assert_eq!(summaries[0].payment_due, 4.25);
        let line = &summaries[0].order_items[0];
        assert_eq!(line.table_id, None);
        assert_eq!(line.table_number, None);
        assert_eq!(line.food_name.as_deref(), Some("Soup"));
    }

    #[tokio::test]
    async fn test_sub_cent_price_is_kept_per_row() {
        let store = Arc::new(MemoryStore::new());
        store.insert_food(food(1, "Mint", 0.005)).await.unwrap();
        store.insert_order(order(7, None)).await.unwrap();
        store
            .insert_order_items(vec![item(1, 7, 1, 1), item(2, 7, 1, 1)])
            .await
            .unwrap();

        let summaries = pipeline(store)
            .compute_order_summaries(Some(7), &QueryContext::background())
            .await
            .unwrap();

        assert!(summaries[0].order_items.iter().all(|l| l.amount == Some(0.005)));
        assert_eq!(summaries[0].payment_due, 0.01);
    }

    #[tokio::test]
    async fn test_sqlite_store_joins_like_memory_store() {
        let (_dir, store) = sqlite_store().await;
        seed_dinner_for_two(store.as_ref()).await;
        store.insert_order(order(7, Some(999))).await.unwrap();
        store
            .insert_order_items(vec![item(303, 7, FOOD_PIZZA, 1)])
            .await
            .unwrap();

        let pipeline = OrderViewPipeline::new(store, AmountPolicy::UnitPrice);
        let summaries = pipeline
            .compute_order_summaries(None, &QueryContext::background())
            .await
            .unwrap();

        let keys: Vec<_> = summaries.iter().map(|s| s.key()).collect();
        assert_eq!(
            keys,
            vec![(Some(ORDER_O1), Some(TABLE_T1), Some(5)), (Some(7), None, None)]
        );
        assert_eq!(summaries[0].payment_due, 17.5);
        assert_eq!(summaries[1].payment_due, 10.0);
    }

    #[tokio::test]
    async fn test_sqlite_summaries_beyond_one_lookup_chunk() {
        let (_dir, store) = sqlite_store().await;
        store.insert_food(food(FOOD_PIZZA, "Pizza", 10.0)).await.unwrap();
        let orders = 1_200_i64;
        for id in 1..=orders {
            store.insert_order(order(id, None)).await.unwrap();
        }
        store
            .insert_order_items(
                (1..=orders)
                    .map(|id| item(10_000 + id, id, FOOD_PIZZA, 1))
                    .collect(),
            )
            .await
            .unwrap();

        let pipeline = OrderViewPipeline::new(store, AmountPolicy::UnitPrice);
        let summaries = pipeline
            .compute_order_summaries(None, &QueryContext::background())
            .await
            .unwrap();

        assert_eq!(summaries.len(), orders as usize);
        assert!(summaries.iter().all(|s| s.order_id.is_some() && s.payment_due == 10.0));
    }

    #[tokio::test]
    async fn test_missing_order_keeps_rows() {
        let store = dinner_for_two().await;
        store.remove_order(ORDER_O1);

        let summaries = pipeline(store)
            .compute_order_summaries(Some(ORDER_O1), &QueryContext::background())
            .await
            .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].key(), (None, None, None));
        assert_eq!(summaries[0].payment_due, 17.5);
        assert_eq!(summaries[0].total_count, 2);
    }

    #[tokio::test]
    async fn test_zero_items_yield_zero_groups() {
        let empty = pipeline(Arc::new(MemoryStore::new()));
        let ctx = QueryContext::background();
        assert!(empty.compute_order_summaries(None, &ctx).await.unwrap().is_empty());

        let seeded = pipeline(dinner_for_two().await);
        assert!(
            seeded
                .compute_order_summaries(Some(999), &ctx)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let pipeline = pipeline(dinner_for_two().await);
        let ctx = QueryContext::background();
        let first = pipeline.compute_order_summaries(None, &ctx).await.unwrap();
        let second = pipeline.compute_order_summaries(None, &ctx).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_store_failure_aborts() {
        let store = FaultyStore::new(dinner_for_two().await, Fault::FailFoods);
        let pipeline = OrderViewPipeline::new(Arc::new(store), AmountPolicy::UnitPrice);

        let err = pipeline
            .compute_order_summaries(None, &QueryContext::background())
            .await
            .unwrap_err();
        assert!(matches!(err, ViewError::StoreUnavailable(msg) if msg.contains("food")));
    }

    #[tokio::test]
    async fn test_slow_store_hits_deadline() {
        let store = FaultyStore::new(
            dinner_for_two().await,
            Fault::SlowTables(Duration::from_secs(5)),
        );
        let pipeline = OrderViewPipeline::new(Arc::new(store), AmountPolicy::UnitPrice);
        let ctx = QueryContext::with_timeout(CancellationToken::new(), Duration::from_millis(50));

        let err = pipeline
            .compute_order_summaries(None, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ViewError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_canceled_context() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = QueryContext::with_token(token);

        let err = pipeline(dinner_for_two().await)
            .compute_order_summaries(None, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ViewError::Canceled));
        assert!(matches!(
            ViewError::from(StoreError::Canceled),
            ViewError::Canceled
        ));
    }

    #[tokio::test]
    async fn test_extended_policy_multiplies_quantity() {
        let pipeline = OrderViewPipeline::new(dinner_for_two().await, AmountPolicy::Extended);
        let summaries = pipeline
            .compute_order_summaries(Some(ORDER_O1), &QueryContext::background())
            .await
            .unwrap();

        assert_eq!(summaries[0].payment_due, 27.5);
        assert_eq!(summaries[0].order_items[0].quantity, 2);
        assert_eq!(summaries[0].order_items[0].amount, Some(20.0));
    }

    #[test]
    fn test_group_rows_interleaved_keys() {
        let line = |id, order_id, amount| OrderItemLine {
            order_item_id: id,
            amount,
            food_name: None,
            food_image: None,
            table_number: None,
            table_id: None,
            order_id,
            quantity: 1,
        };
        let groups = group_rows(vec![
            line(1, Some(2), Some(1.1)),
            line(2, Some(1), Some(5.0)),
            line(3, Some(2), Some(2.2)),
            line(4, None, None),
        ]);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].order_id, Some(2));
        assert_eq!(groups[0].payment_due, 3.3);
        assert_eq!(groups[0].total_count, 2);
        assert_eq!(groups[1].order_id, Some(1));
        assert_eq!(groups[2].payment_due, 0.0);
        assert_eq!(groups[2].total_count, 1);
    }
}
