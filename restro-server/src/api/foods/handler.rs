//! Food API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Food, FoodCreate};

use crate::core::ServerState;
use crate::db::repository::{FoodRepository, RepoError};
use crate::utils::AppResult;

/// POST /api/foods - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FoodCreate>,
) -> AppResult<(StatusCode, Json<Food>)> {
    let repo = FoodRepository::new(state.store.clone());
    let food = repo.create(&state.query_context(), payload).await?;
    Ok((StatusCode::CREATED, Json(food)))
}

/// GET /api/foods/{id} - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Food>> {
    let repo = FoodRepository::new(state.store.clone());
    let food = repo
        .find_by_id(&state.query_context(), id)
        .await?
        .ok_or(RepoError::NotFound { resource: "food", id })?;
    Ok(Json(food))
}
