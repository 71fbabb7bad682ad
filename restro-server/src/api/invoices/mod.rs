//! Invoice API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/invoices", get(handler::list).post(handler::create))
        .route(
            "/api/invoices/{id}",
            get(handler::get_view).put(handler::update),
        )
}
