//! In-process store backend
//!
//! Backs engine and handler tests, and lets the server run without store
//! credentials during development. Mirrors the sheet semantics: row 1 is
//! the header, deletions shift the rows below up.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::{StoreError, StoreHandle, StoreResult, TabularStore, rows_to_records};
use shared::models::Record;

#[derive(Default)]
struct Sheets {
    products: Vec<Vec<String>>,
    stock: Vec<Vec<String>>,
}

/// In-memory tabular store
#[derive(Default)]
pub struct MemoryStore {
    sheets: Mutex<Sheets>,
    fail_reads: AtomicBool,
    read_count: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed both sheets (header rows included)
    pub fn with_data(products: Vec<Vec<String>>, stock: Vec<Vec<String>>) -> Self {
        Self {
            sheets: Mutex::new(Sheets { products, stock }),
            ..Self::default()
        }
    }

    /// Make subsequent reads fail, simulating a store outage
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// How many full reads (product or stock) have been served
    pub fn read_count(&self) -> u32 {
        self.read_count.load(Ordering::SeqCst)
    }

    /// Current raw stock rows, header included
    pub fn stock_rows(&self) -> Vec<Vec<String>> {
        self.sheets.lock().stock.clone()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated outage".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TabularStore for MemoryStore {
    async fn open_catalog(&self) -> StoreResult<StoreHandle> {
        self.check_available()?;
        Ok(StoreHandle::new("memory"))
    }

    async fn read_products(&self, _handle: &StoreHandle) -> StoreResult<Vec<Record>> {
        self.check_available()?;
        self.read_count.fetch_add(1, Ordering::SeqCst);
        Ok(rows_to_records(&self.sheets.lock().products))
    }

    async fn read_stock_rows(&self, _handle: &StoreHandle) -> StoreResult<Vec<Vec<String>>> {
        self.check_available()?;
        self.read_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.sheets.lock().stock.clone())
    }

    async fn update_cell(
        &self,
        _handle: &StoreHandle,
        row_id: u32,
        col: u32,
        value: &str,
    ) -> StoreResult<()> {
        let mut sheets = self.sheets.lock();
        let idx = row_id as usize - 1;
        let row = sheets.stock.get_mut(idx).ok_or_else(|| StoreError::Api {
            status: 400,
            message: format!("row {} out of range", row_id),
        })?;
        if row.len() <= col as usize {
            row.resize(col as usize + 1, String::new());
        }
        row[col as usize] = value.to_string();
        Ok(())
    }

    async fn append_row(&self, _handle: &StoreHandle, values: &[String]) -> StoreResult<()> {
        self.sheets.lock().stock.push(values.to_vec());
        Ok(())
    }

    async fn delete_row(&self, _handle: &StoreHandle, row_id: u32) -> StoreResult<()> {
        let mut sheets = self.sheets.lock();
        let idx = row_id as usize - 1;
        if idx >= sheets.stock.len() {
            return Err(StoreError::Api {
                status: 400,
                message: format!("row {} out of range", row_id),
            });
        }
        sheets.stock.remove(idx);
        Ok(())
    }
}
