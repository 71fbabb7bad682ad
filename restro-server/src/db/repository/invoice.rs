//! Invoice Repository

use std::sync::Arc;

use shared::models::{
    Invoice, InvoiceCreate, InvoiceUpdate, PAYMENT_METHODS, PAYMENT_STATUS_PENDING,
};
use shared::util::{DAY_MILLIS, now_millis, snowflake_id};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::{QueryContext, Store};

#[derive(Clone)]
pub struct InvoiceRepository {
    base: BaseRepository,
}

impl InvoiceRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            base: BaseRepository::new(store),
        }
    }

    pub async fn find_all(&self, ctx: &QueryContext) -> RepoResult<Vec<Invoice>> {
        let store = self.base.store();
        Ok(ctx.run(store.list_invoices(ctx)).await?)
    }

    /// Create an invoice for an existing order, due one day from now
    pub async fn create(&self, ctx: &QueryContext, data: InvoiceCreate) -> RepoResult<Invoice> {
        validate_method(data.payment_method.as_deref())?;
        let payment_status = validate_status(data.payment_status)?
            .unwrap_or_else(|| PAYMENT_STATUS_PENDING.to_string());

        let store = self.base.store();
        if ctx.run(store.find_order(ctx, data.order_id)).await?.is_none() {
            return Err(RepoError::NotFound {
                resource: "order",
                id: data.order_id,
            });
        }

        let now = now_millis();
        let invoice = Invoice {
            id: snowflake_id(),
            order_id: data.order_id,
            payment_method: data.payment_method,
            payment_status,
            payment_due_date: now + DAY_MILLIS,
            created_at: now,
            updated_at: now,
        };
        ctx.run(store.insert_invoice(invoice.clone())).await?;
        tracing::info!(invoice_id = invoice.id, order_id = invoice.order_id, "Invoice created");
        Ok(invoice)
    }

    /// Record payment method and status; absent fields keep their value
    pub async fn update(
        &self,
        ctx: &QueryContext,
        id: i64,
        data: InvoiceUpdate,
    ) -> RepoResult<Invoice> {
        validate_method(data.payment_method.as_deref())?;
        let payment_status = validate_status(data.payment_status)?;

        let store = self.base.store();
        let existing = ctx
            .run(store.find_invoice(ctx, id))
            .await?
            .ok_or(RepoError::NotFound {
                resource: "invoice",
                id,
            })?;

        let invoice = Invoice {
            payment_method: data.payment_method.or(existing.payment_method.clone()),
            payment_status: payment_status.unwrap_or(existing.payment_status.clone()),
            updated_at: now_millis(),
            ..existing
        };
        if !ctx.run(store.update_invoice(invoice.clone())).await? {
            return Err(RepoError::NotFound {
                resource: "invoice",
                id,
            });
        }
        tracing::info!(
            invoice_id = id,
            payment_status = %invoice.payment_status,
            payment_method = ?invoice.payment_method,
            "Invoice updated"
        );
        Ok(invoice)
    }
}

fn validate_method(method: Option<&str>) -> RepoResult<()> {
    match method {
        Some(method) if !PAYMENT_METHODS.contains(&method) => {
            Err(RepoError::PaymentMethod(method.to_string()))
        }
        _ => Ok(()),
    }
}

fn validate_status(status: Option<String>) -> RepoResult<Option<String>> {
    match status {
        Some(status) if status.trim().is_empty() => Err(RepoError::Validation(
            "payment_status must not be empty".to_string(),
        )),
        other => Ok(other),
    }
}
