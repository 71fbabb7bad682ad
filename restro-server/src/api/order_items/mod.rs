//! Order Item API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/order-items",
            get(handler::list).post(handler::create_pack),
        )
        .route("/api/order-items/summaries", get(handler::summaries))
        .route(
            "/api/order-items/{id}",
            get(handler::get_by_id).put(handler::update),
        )
}
