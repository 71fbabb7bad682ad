//! Unified error handling
//!
//! Handlers return [`AppResult`]; failures render through the shared
//! [`AppError`] `IntoResponse` implementation as
//! `{ "code": 4010, "message": "...", "details": {...} }` with the HTTP status
//! derived from the [`ErrorCode`].
//!
//! Layer errors convert into [`AppError`] at the handler boundary:
//!
//! | Source | Conversion |
//! |--------|------------|
//! | `ViewError` | `crate::views` |
//! | `RepoError` | `crate::db::repository` |

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
