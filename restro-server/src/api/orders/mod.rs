//! Order API Module
//!
//! Order headers plus the per-order summary view.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", get(handler::list).post(handler::create))
        .route(
            "/api/orders/{id}",
            get(handler::get_by_id).put(handler::update),
        )
        // Joined and grouped items of one order
        .route("/api/orders/{id}/items", get(handler::summaries))
}
