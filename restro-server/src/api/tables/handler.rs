//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};

use crate::core::ServerState;
use crate::db::repository::{DiningTableRepository, RepoError};
use crate::utils::AppResult;

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let repo = DiningTableRepository::new(state.store.clone());
    let tables = repo.find_all(&state.query_context()).await?;
    Ok(Json(tables))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<(StatusCode, Json<DiningTable>)> {
    let repo = DiningTableRepository::new(state.store.clone());
    let table = repo.create(&state.query_context(), payload).await?;
    Ok((StatusCode::CREATED, Json(table)))
}

/// GET /api/tables/{id} - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.store.clone());
    let table = repo
        .find_by_id(&state.query_context(), id)
        .await?
        .ok_or(RepoError::NotFound {
            resource: "table",
            id,
        })?;
    Ok(Json(table))
}

/// PUT /api/tables/{id} - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.store.clone());
    let table = repo.update(&state.query_context(), id, payload).await?;
    Ok(Json(table))
}
