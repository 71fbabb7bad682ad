//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::OrderSummary;
use shared::models::{Order, OrderCreate, OrderUpdate};

use crate::core::ServerState;
use crate::db::repository::{OrderRepository, RepoError};
use crate::utils::AppResult;

/// GET /api/orders - 订单列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.store.clone());
    let orders = repo.find_all(&state.query_context()).await?;
    Ok(Json(orders))
}

/// POST /api/orders - 创建订单
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let repo = OrderRepository::new(state.store.clone());
    let order = repo.create(&state.query_context(), payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders/{id} - 获取订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.store.clone());
    let order = repo
        .find_by_id(&state.query_context(), id)
        .await?
        .ok_or(RepoError::NotFound {
            resource: "order",
            id,
        })?;
    Ok(Json(order))
}

/// PUT /api/orders/{id} - 更新订单 (桌台 / 日期)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.store.clone());
    let order = repo.update(&state.query_context(), id, payload).await?;
    Ok(Json(order))
}

/// GET /api/orders/{id}/items - 订单汇总
///
/// An order with no items yields an empty array.
pub async fn summaries(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<OrderSummary>>> {
    let ctx = state.query_context();
    let summaries = state.pipeline.compute_order_summaries(Some(id), &ctx).await?;
    Ok(Json(summaries))
}
