//! Invoice API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::InvoiceView;
use shared::models::{Invoice, InvoiceCreate, InvoiceUpdate};

use crate::core::ServerState;
use crate::db::repository::InvoiceRepository;
use crate::utils::AppResult;

/// GET /api/invoices - 发票列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Invoice>>> {
    let repo = InvoiceRepository::new(state.store.clone());
    let invoices = repo.find_all(&state.query_context()).await?;
    Ok(Json(invoices))
}

/// POST /api/invoices - 创建发票
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InvoiceCreate>,
) -> AppResult<(StatusCode, Json<Invoice>)> {
    let repo = InvoiceRepository::new(state.store.clone());
    let invoice = repo.create(&state.query_context(), payload).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// GET /api/invoices/{id} - 发票视图
///
/// 422 when the invoice's order has no items yet.
pub async fn get_view(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<InvoiceView>> {
    let ctx = state.query_context();
    let view = state.invoices.build_invoice_view(id, &ctx).await?;
    Ok(Json(view))
}

/// PUT /api/invoices/{id} - 更新支付方式 / 支付状态
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<InvoiceUpdate>,
) -> AppResult<Json<Invoice>> {
    let repo = InvoiceRepository::new(state.store.clone());
    let invoice = repo.update(&state.query_context(), id, payload).await?;
    Ok(Json(invoice))
}
