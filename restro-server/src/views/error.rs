//! View engine errors

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Clone, Error)]
pub enum ViewError {
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    /// The invoice exists but its order has no items to bill
    #[error("Order {order_id} has no billable items")]
    NoBillableItems { order_id: i64 },

    #[error("Computation canceled")]
    Canceled,

    #[error("Computation deadline exceeded")]
    DeadlineExceeded,

    #[error("Order {order_id} resolved to {groups} summary groups")]
    AmbiguousGrouping { order_id: i64, groups: usize },
}

pub type ViewResult<T> = Result<T, ViewError>;

impl From<StoreError> for ViewError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Canceled => ViewError::Canceled,
            StoreError::DeadlineExceeded => ViewError::DeadlineExceeded,
            other => ViewError::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<ViewError> for AppError {
    fn from(err: ViewError) -> Self {
        let message = err.to_string();
        match err {
            ViewError::StoreUnavailable(_) => AppError::store_unavailable(message),
            ViewError::NotFound { resource, id } => {
                let code = match resource {
                    "invoice" => ErrorCode::InvoiceNotFound,
                    "order" => ErrorCode::OrderNotFound,
                    "food" => ErrorCode::FoodNotFound,
                    "table" => ErrorCode::TableNotFound,
                    _ => ErrorCode::NotFound,
                };
                AppError::with_message(code, message).with_detail("id", id)
            }
            ViewError::NoBillableItems { order_id } => {
                AppError::with_message(ErrorCode::NoBillableItems, message)
                    .with_detail("order_id", order_id)
            }
            ViewError::Canceled => AppError::with_message(ErrorCode::RequestCanceled, message),
            ViewError::DeadlineExceeded => AppError::with_message(ErrorCode::TimeoutError, message),
            ViewError::AmbiguousGrouping { order_id, groups } => {
                AppError::with_message(ErrorCode::AmbiguousGrouping, message)
                    .with_detail("order_id", order_id)
                    .with_detail("groups", groups)
            }
        }
    }
}
