//! Unified error handling for the Larder service
//!
//! Structure mirrors the API surface:
//!
//! - [`codes`] - numeric error codes grouped by category range
//! - [`category`] - category classification from code ranges
//! - [`types`] - `AppError`, `ApiResponse` and axum integration
//! - [`http`] - HTTP status mapping per error code

pub mod category;
pub mod codes;
pub mod http;
pub mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
