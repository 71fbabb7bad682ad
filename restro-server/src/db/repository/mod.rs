//! Repository Module
//!
//! Creation and update rules and lookups for every collection, on top of the
//! [`Store`](super::Store). The view engine reads the store directly; these
//! repositories are what the write handlers go through.

pub mod dining_table;
pub mod food;
pub mod invoice;
pub mod order;

pub use dining_table::DiningTableRepository;
pub use food::FoodRepository;
pub use invoice::InvoiceRepository;
pub use order::OrderRepository;

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use super::store::{Store, StoreError};
use crate::money::AmountError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Table number {0} already exists")]
    TableNumberTaken(i32),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid payment method: {0}")]
    PaymentMethod(String),

    #[error("Invalid food price: {0}")]
    FoodPrice(AmountError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RepoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { collection, id } => {
                RepoError::Duplicate(format!("{collection} {id} already exists"))
            }
            other => RepoError::Store(other),
        }
    }
}

impl From<AmountError> for RepoError {
    fn from(err: AmountError) -> Self {
        RepoError::Validation(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        let message = err.to_string();
        match err {
            RepoError::NotFound { resource, id } => {
                let code = match resource {
                    "food" => ErrorCode::FoodNotFound,
                    "table" => ErrorCode::TableNotFound,
                    "order" => ErrorCode::OrderNotFound,
                    "order_item" => ErrorCode::OrderItemNotFound,
                    "invoice" => ErrorCode::InvoiceNotFound,
                    _ => ErrorCode::NotFound,
                };
                AppError::with_message(code, message).with_detail("id", id)
            }
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::TableNumberTaken(number) => {
                AppError::with_message(ErrorCode::TableNumberExists, message)
                    .with_detail("table_number", number)
            }
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::PaymentMethod(_) => {
                AppError::with_message(ErrorCode::PaymentInvalidMethod, message)
            }
            RepoError::FoodPrice(_) => {
                AppError::with_message(ErrorCode::FoodInvalidPrice, message)
            }
            RepoError::Store(StoreError::Canceled) => {
                AppError::with_message(ErrorCode::RequestCanceled, message)
            }
            RepoError::Store(StoreError::DeadlineExceeded) => {
                AppError::with_message(ErrorCode::TimeoutError, message)
            }
            RepoError::Store(_) => AppError::store_unavailable(message),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with store reference
#[derive(Clone)]
pub struct BaseRepository {
    store: Arc<dyn Store>,
}

impl BaseRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
