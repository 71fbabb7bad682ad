//! Invoice view builder

use std::sync::Arc;

use shared::models::Invoice;
use shared::order::{GroupingDiagnostic, InvoiceView, OrderSummary, PAYMENT_METHOD_UNSET};
use tracing::{instrument, warn};

use super::GroupingPolicy;
use super::error::{ViewError, ViewResult};
use super::pipeline::OrderViewPipeline;
use crate::db::{QueryContext, RecordStore};

/// Builds presentation-ready invoices
#[derive(Clone)]
pub struct InvoiceViewBuilder {
    store: Arc<dyn RecordStore>,
    pipeline: OrderViewPipeline,
    grouping: GroupingPolicy,
}

impl InvoiceViewBuilder {
    pub fn new(
        store: Arc<dyn RecordStore>,
        pipeline: OrderViewPipeline,
        grouping: GroupingPolicy,
    ) -> Self {
        Self {
            store,
            pipeline,
            grouping,
        }
    }

    #[instrument(skip(self, ctx))]
    pub async fn build_invoice_view(
        &self,
        invoice_id: i64,
        ctx: &QueryContext,
    ) -> ViewResult<InvoiceView> {
        let invoice = ctx
            .run(self.store.find_invoice(ctx, invoice_id))
            .await?
            .ok_or(ViewError::NotFound {
                resource: "invoice",
                id: invoice_id,
            })?;

        let summaries = self
            .pipeline
            .compute_order_summaries(Some(invoice.order_id), ctx)
            .await?;
        let (summary, grouping) = select_summary(summaries, invoice.order_id, self.grouping)?;

        Ok(merge_invoice(invoice, summary, grouping))
    }
}

/// Pick the summary an invoice is rendered from
///
/// Zero summaries is `NoBillableItems`. Several summaries resolve per the
/// grouping policy.
pub fn select_summary(
    summaries: Vec<OrderSummary>,
    order_id: i64,
    policy: GroupingPolicy,
) -> ViewResult<(OrderSummary, Option<GroupingDiagnostic>)> {
    let group_count = summaries.len();
    let mut iter = summaries.into_iter();
    let Some(first) = iter.next() else {
        return Err(ViewError::NoBillableItems { order_id });
    };
    if group_count == 1 {
        return Ok((first, None));
    }

    match policy {
        GroupingPolicy::First => {
            warn!(
                order_id,
                groups = group_count,
                "Invoice order resolved to several summary groups, using the first"
            );
            Ok((first, Some(GroupingDiagnostic { group_count })))
        }
        GroupingPolicy::Reject => Err(ViewError::AmbiguousGrouping {
            order_id,
            groups: group_count,
        }),
    }
}

fn merge_invoice(
    invoice: Invoice,
    summary: OrderSummary,
    grouping: Option<GroupingDiagnostic>,
) -> InvoiceView {
    InvoiceView {
        invoice_id: invoice.id,
        payment_method: invoice
            .payment_method
            .unwrap_or_else(|| PAYMENT_METHOD_UNSET.to_string()),
        order_id: invoice.order_id,
        payment_status: invoice.payment_status,
        payment_due: summary.payment_due,
        table_number: summary.table_number,
        payment_due_date: invoice.payment_due_date,
        order_items: summary.order_items,
        grouping,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, RecordWriter};
    use crate::views::AmountPolicy;
    use crate::views::test_support::*;

    fn builder(store: Arc<dyn RecordStore>, grouping: GroupingPolicy) -> InvoiceViewBuilder {
        let pipeline = OrderViewPipeline::new(store.clone(), AmountPolicy::UnitPrice);
        InvoiceViewBuilder::new(store, pipeline, grouping)
    }

    fn summary(order_id: i64, payment_due: f64) -> OrderSummary {
        OrderSummary {
            order_id: Some(order_id),
            table_id: None,
            table_number: None,
            payment_due,
            total_count: 1,
            order_items: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_invoice_for_dinner_for_two() {
        let view = builder(dinner_for_two().await, GroupingPolicy::First)
            .build_invoice_view(INVOICE_I1, &QueryContext::background())
            .await
            .unwrap();

        assert_eq!(view.invoice_id, INVOICE_I1);
        assert_eq!(view.payment_method, "null");
        assert_eq!(view.payment_status, "PENDING");
        assert_eq!(view.payment_due, 17.5);
        assert_eq!(view.table_number, Some(5));
        assert_eq!(view.order_id, ORDER_O1);
        assert_eq!(view.payment_due_date, 86_400_000);
        assert_eq!(view.order_items.len(), 2);
        assert!(view.grouping.is_none());
    }

    #[tokio::test]
    async fn test_stored_payment_method_is_kept() {
        let store = dinner_for_two().await;
        let mut paid = invoice(401, ORDER_O1);
        paid.payment_method = Some("CARD".to_string());
        paid.payment_status = "PAID".to_string();
        store.insert_invoice(paid).await.unwrap();

        let view = builder(store, GroupingPolicy::First)
            .build_invoice_view(401, &QueryContext::background())
            .await
            .unwrap();
        assert_eq!(view.payment_method, "CARD");
        assert_eq!(view.payment_status, "PAID");
    }

    #[tokio::test]
    async fn test_invoice_without_items() {
        let store = Arc::new(MemoryStore::new());
        store.insert_order(order(5, None)).await.unwrap();
        store.insert_invoice(invoice(6, 5)).await.unwrap();

        let err = builder(store, GroupingPolicy::First)
            .build_invoice_view(6, &QueryContext::background())
            .await
            .unwrap_err();
        assert!(matches!(err, ViewError::NoBillableItems { order_id: 5 }));
    }

    #[tokio::test]
    async fn test_missing_invoice() {
        let err = builder(dinner_for_two().await, GroupingPolicy::First)
            .build_invoice_view(12345, &QueryContext::background())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ViewError::NotFound {
                resource: "invoice",
                id: 12345
            }
        ));
    }

    #[tokio::test]
    async fn test_invoice_store_failure() {
        let store = FaultyStore::new(dinner_for_two().await, Fault::FailInvoices);
        let err = builder(Arc::new(store), GroupingPolicy::First)
            .build_invoice_view(INVOICE_I1, &QueryContext::background())
            .await
            .unwrap_err();
        assert!(matches!(err, ViewError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_several_groups_first_policy() {
        let store = dinner_for_two().await;
        store.insert_order(order(201, None)).await.unwrap();
        store
            .insert_order_items(vec![item(500, 201, FOOD_PIZZA, 1)])
            .await
            .unwrap();
        let store = Arc::new(FaultyStore::new(store, Fault::IgnoreFilter));

        let view = builder(store, GroupingPolicy::First)
            .build_invoice_view(INVOICE_I1, &QueryContext::background())
            .await
            .unwrap();
        assert_eq!(view.grouping, Some(GroupingDiagnostic { group_count: 2 }));
        assert_eq!(view.payment_due, 17.5);
    }

    #[tokio::test]
    async fn test_several_groups_reject_policy() {
        let store = dinner_for_two().await;
        store.insert_order(order(201, None)).await.unwrap();
        store
            .insert_order_items(vec![item(500, 201, FOOD_PIZZA, 1)])
            .await
            .unwrap();
        let store = Arc::new(FaultyStore::new(store, Fault::IgnoreFilter));

        let err = builder(store, GroupingPolicy::Reject)
            .build_invoice_view(INVOICE_I1, &QueryContext::background())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ViewError::AmbiguousGrouping {
                order_id: ORDER_O1,
                groups: 2
            }
        ));
    }

    #[test]
    fn test_select_summary_cases() {
        assert!(matches!(
            select_summary(Vec::new(), 1, GroupingPolicy::First),
            Err(ViewError::NoBillableItems { order_id: 1 })
        ));

        let (picked, diag) =
            select_summary(vec![summary(1, 3.0)], 1, GroupingPolicy::Reject).unwrap();
        assert_eq!(picked.payment_due, 3.0);
        assert!(diag.is_none());

        let (picked, diag) = select_summary(
            vec![summary(1, 3.0), summary(2, 4.0), summary(3, 5.0)],
            1,
            GroupingPolicy::First,
        )
        .unwrap();
        assert_eq!(picked.order_id, Some(1));
        assert_eq!(diag, Some(GroupingDiagnostic { group_count: 3 }));
    }
}
