//! Remote tabular store access
//!
//! The catalog and the stock sheet live in a remote spreadsheet service.
//! Everything above this module talks to the [`TabularStore`] trait; the
//! concrete backends are [`SheetStore`] (HTTP) and [`MemoryStore`] (tests
//! and credential-less development runs).

mod memory;
mod sheets;

pub use memory::MemoryStore;
pub use sheets::SheetStore;

use async_trait::async_trait;
use shared::AppError;
use shared::models::Record;
use thiserror::Error;

/// Remote store error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (connection, timeout, TLS)
    #[error("Store request failed: {0}")]
    Http(String),

    /// The store answered with a non-success status
    #[error("Store API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The store answered with a body we could not decode
    #[error("Store response decode failed: {0}")]
    Decode(String),

    /// The store is not reachable at all
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Self::Unavailable(e.to_string())
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(_) => AppError::store_unavailable(),
            other => AppError::store(other.to_string()),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Opaque handle to an opened catalog
///
/// Obtained once per snapshot fetch and passed back to every read and
/// write. Callers never look inside it.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    pub(crate) spreadsheet_id: String,
}

impl StoreHandle {
    pub(crate) fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
        }
    }
}

/// Async access to the remote catalog and stock sheets
///
/// `row_id` arguments are 1-based sheet positions (row 1 is the header);
/// `col` arguments are 0-based column indexes.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Open the configured catalog, verifying it is reachable
    async fn open_catalog(&self) -> StoreResult<StoreHandle>;

    /// Read the product catalog as header-keyed records
    async fn read_products(&self, handle: &StoreHandle) -> StoreResult<Vec<Record>>;

    /// Read the raw stock sheet including the header row
    async fn read_stock_rows(&self, handle: &StoreHandle) -> StoreResult<Vec<Vec<String>>>;

    /// Overwrite a single cell in the stock sheet
    async fn update_cell(
        &self,
        handle: &StoreHandle,
        row_id: u32,
        col: u32,
        value: &str,
    ) -> StoreResult<()>;

    /// Append a row at the bottom of the stock sheet
    async fn append_row(&self, handle: &StoreHandle, values: &[String]) -> StoreResult<()>;

    /// Delete one row from the stock sheet, shifting the rows below up
    async fn delete_row(&self, handle: &StoreHandle, row_id: u32) -> StoreResult<()>;
}

/// Build header-keyed records from raw rows (first row = headers)
///
/// Header cells are trimmed and uppercased so the catalog survives the
/// hand-edited sheets it comes from. Short rows simply omit the trailing
/// keys.
pub(crate) fn rows_to_records(rows: &[Vec<String>]) -> Vec<Record> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    let headers: Vec<String> = header.iter().map(|h| h.trim().to_uppercase()).collect();

    data.iter()
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.clone(), v.clone()))
                .collect()
        })
        .collect()
}
