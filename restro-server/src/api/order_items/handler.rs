//! Order Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::OrderSummary;
use shared::models::{OrderItem, OrderItemPack, OrderItemPackCreated, OrderItemUpdate};

use crate::core::ServerState;
use crate::db::repository::{OrderRepository, RepoError};
use crate::utils::AppResult;

/// GET /api/order-items - 全部订单明细 (未关联)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderItem>>> {
    let repo = OrderRepository::new(state.store.clone());
    let items = repo.find_items(&state.query_context(), None).await?;
    Ok(Json(items))
}

/// GET /api/order-items/summaries - 所有订单的汇总
pub async fn summaries(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderSummary>>> {
    let ctx = state.query_context();
    let summaries = state.pipeline.compute_order_summaries(None, &ctx).await?;
    Ok(Json(summaries))
}

/// POST /api/order-items - 新建订单并批量写入明细
pub async fn create_pack(
    State(state): State<ServerState>,
    Json(payload): Json<OrderItemPack>,
) -> AppResult<(StatusCode, Json<OrderItemPackCreated>)> {
    let repo = OrderRepository::new(state.store.clone());
    let created = repo.create_pack(&state.query_context(), payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/order-items/{id} - 单个订单明细 (未关联)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderItem>> {
    let repo = OrderRepository::new(state.store.clone());
    let item = repo
        .find_item(&state.query_context(), id)
        .await?
        .ok_or(RepoError::NotFound {
            resource: "order_item",
            id,
        })?;
    Ok(Json(item))
}

/// PUT /api/order-items/{id} - 更新订单明细
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderItemUpdate>,
) -> AppResult<Json<OrderItem>> {
    let repo = OrderRepository::new(state.store.clone());
    let item = repo.update_item(&state.query_context(), id, payload).await?;
    Ok(Json(item))
}
