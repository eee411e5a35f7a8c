//! Shared domain types for the Larder inventory service
//!
//! This crate holds everything both the server and tooling need to agree on:
//!
//! - **Models** (`models`): catalog products, stock rows, label copy limits
//! - **Errors** (`error`): unified error codes, `AppError`, `ApiResponse`
//! - **Utilities** (`util`): permissive date parsing and time helpers

pub mod error;
pub mod models;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Category, ProductRecord, StockRow};
