//! Utilities: unified error re-exports and logging setup
//!
//! - [`AppError`] / [`ApiResponse`] (from `shared::error`)
//! - [`logger`] - tracing subscriber initialisation

pub mod error;
pub mod logger;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
