//! Food API 模块

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/foods", post(handler::create))
        .route("/api/foods/{id}", get(handler::get_by_id))
}
