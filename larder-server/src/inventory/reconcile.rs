//! Stock reconciliation engine
//!
//! Every mutation of the stock sheet funnels through here: resolve the
//! product from the cached catalog, resolve a lot for it, compute whether
//! the delta folds into an existing row or appends a new one, write exactly
//! one cell update or row append per line item, then invalidate the cache.
//! Label building happens on the resolved values, never on raw input.

use chrono::{Days, NaiveDate};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::cache::{Snapshot, SnapshotCache};
use crate::inventory::{fifo, lot};
use crate::store::{StoreHandle, StoreResult, TabularStore};
use larder_printer::LabelContent;
use serde::{Deserialize, Serialize};
use shared::models::label::{MAX_LABEL_COPIES, clamp_copies};
use shared::models::stock::{DEFAULT_PACKAGING, FIRST_DATA_ROW, NOT_AVAILABLE, columns};
use shared::util::{LABEL_DATE_FMT, STORE_DATE_FMT, today};
use shared::{AppError, AppResult, Category, ErrorCode, ProductRecord};

/// Outcome of one stock write
#[derive(Debug, Clone, Serialize)]
pub struct StockWrite {
    pub product_name: String,
    pub quantity: i64,
    pub lot: String,
    /// Day-first display date
    pub start_date: String,
    /// Day-first display date or "N/D"
    pub expiry_date: String,
    /// Sheet row the quantity was folded into, absent when appended
    pub folded_into_row: Option<u32>,
}

/// One entry of a prepared line batch, shown to the operator before the
/// commit so the proposed lot can be confirmed or overridden
#[derive(Debug, Clone, Serialize)]
pub struct LinePlanItem {
    pub product_name: String,
    pub category: Category,
    pub quantity: i64,
    /// Proposed lot, empty when none can be resolved yet
    pub lot: String,
}

/// One requested line item: missing quantity falls back to the product's
/// default run quantity, missing lot goes through normal lot resolution
#[derive(Debug, Clone, Deserialize)]
pub struct LineOrder {
    pub product_name: String,
    #[serde(default)]
    pub lot: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl LineOrder {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            lot: None,
            quantity: None,
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

struct PlannedItem {
    product: ProductRecord,
    quantity: i64,
    lot: String,
}

/// The reconciliation engine
///
/// Reads go through the snapshot cache; writes go straight to the store
/// and invalidate the cache afterwards, whether or not they succeeded.
pub struct Inventory {
    store: Arc<dyn TabularStore>,
    cache: Arc<SnapshotCache>,
}

impl Inventory {
    pub fn new(store: Arc<dyn TabularStore>, cache: Arc<SnapshotCache>) -> Self {
        Self { store, cache }
    }

    /// Record a received or produced quantity and return the write outcome
    ///
    /// The outcome carries everything a label needs: the resolved lot and
    /// the display dates.
    #[instrument(skip(self))]
    pub async fn add_stock(
        &self,
        product_name: &str,
        quantity: i64,
        caller_lot: Option<&str>,
    ) -> AppResult<StockWrite> {
        if quantity < 1 {
            return Err(AppError::invalid_request("Quantity must be at least 1"));
        }

        // Mutations always reconcile against a fresh snapshot
        let snapshot = self.cache.read(true).await;
        let handle = require_handle(&snapshot)?;
        let product = snapshot
            .find_product(product_name)
            .ok_or_else(|| AppError::product_not_found(product_name.trim()))?
            .clone();

        let today = today();
        let resolved_lot = resolve_lot(&product, caller_lot, &snapshot.stock, today)?;
        let (expiry_store, expiry_display) = expiry_for(&product, today);

        let written = self
            .persist_delta(
                &handle,
                &snapshot,
                &product,
                &resolved_lot,
                quantity,
                today,
                &expiry_store,
            )
            .await;
        self.cache.invalidate();
        let folded_into_row = written.map_err(AppError::from)?;

        info!(
            product = %product.name,
            quantity,
            lot = %resolved_lot,
            folded = folded_into_row.is_some(),
            "stock recorded"
        );

        Ok(StockWrite {
            product_name: product.name,
            quantity,
            lot: resolved_lot,
            start_date: today.format(LABEL_DATE_FMT).to_string(),
            expiry_date: expiry_display,
            folded_into_row,
        })
    }

    /// Record stock and build the label for it
    ///
    /// Without an explicit copy count the label prints one page per
    /// recorded unit.
    pub async fn print_label(
        &self,
        product_name: &str,
        quantity: i64,
        caller_lot: Option<&str>,
        copies: Option<u32>,
    ) -> AppResult<(LabelContent, u32)> {
        let write = self.add_stock(product_name, quantity, caller_lot).await?;
        let copies = copies.unwrap_or_else(|| copies_for_quantity(quantity));
        let content = LabelContent::new(
            write.product_name,
            write.start_date,
            write.expiry_date,
            write.lot,
        );
        Ok((content, clamp_copies(copies)))
    }

    /// The daily production line batch: every daily-required product with
    /// its default run quantity and the lot the commit would use
    pub async fn line_plan(&self) -> AppResult<Vec<LinePlanItem>> {
        let snapshot = self.cache.read(false).await;
        require_handle(&snapshot)?;
        let today = today();

        Ok(snapshot
            .products
            .iter()
            .filter(|p| p.daily_required)
            .map(|p| LinePlanItem {
                product_name: p.name.clone(),
                category: p.category,
                quantity: p.line_quantity as i64,
                lot: resolve_lot(p, None, &snapshot.stock, today).unwrap_or_default(),
            })
            .collect())
    }

    /// Commit a line batch: write every item's stock and build its label
    ///
    /// Lots are resolved for the whole batch before the first write, so an
    /// unresolvable external lot aborts cleanly. Products the catalog does
    /// not know are skipped with a warning. During the write pass a store
    /// failure skips that item only; the line must keep moving.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn line_print(&self, items: &[LineOrder]) -> AppResult<Vec<(LabelContent, u32)>> {
        let snapshot = self.cache.read(true).await;
        let handle = require_handle(&snapshot)?;
        let today = today();

        // Planning pass: resolve everything before touching the store
        let mut planned = Vec::new();
        for item in items {
            let Some(product) = snapshot.find_product(&item.product_name) else {
                warn!(product = %item.product_name, "line item not in catalog, skipped");
                continue;
            };
            let quantity = match item.quantity {
                Some(q) if q >= 1 => q,
                _ => product.line_quantity as i64,
            };
            let lot = resolve_lot(product, item.lot.as_deref(), &snapshot.stock, today)?;
            planned.push(PlannedItem {
                product: product.clone(),
                quantity,
                lot,
            });
        }

        if planned.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::EmptyBatch,
                "No known products in the line batch",
            ));
        }

        // Write pass: one item at a time, per-item failures logged.
        // Line goods are consumed the same day they are produced, so the
        // sheet gets a same-day expiry, not the shelf-life one.
        let mut labels = Vec::with_capacity(planned.len());
        let today_store = today.format(STORE_DATE_FMT).to_string();
        let today_display = today.format(LABEL_DATE_FMT).to_string();
        for item in &planned {
            if let Err(e) = self
                .persist_delta(
                    &handle,
                    &snapshot,
                    &item.product,
                    &item.lot,
                    item.quantity,
                    today,
                    &today_store,
                )
                .await
            {
                error!(product = %item.product.name, error = %e, "line item write failed, skipped");
                continue;
            }
            // One label page per produced unit
            labels.push((
                LabelContent::new(
                    item.product.name.clone(),
                    today_display.clone(),
                    today_display.clone(),
                    item.lot.clone(),
                ),
                copies_for_quantity(item.quantity),
            ));
        }

        self.cache.invalidate();
        info!(printed = labels.len(), "line batch committed");
        Ok(labels)
    }

    /// Rebuild a label from current stock without writing anything
    #[instrument(skip(self))]
    pub async fn reprint(
        &self,
        product_name: &str,
        caller_lot: Option<&str>,
        copies: u32,
    ) -> AppResult<(LabelContent, u32)> {
        let snapshot = self.cache.read(true).await;
        require_handle(&snapshot)?;
        let product = snapshot
            .find_product(product_name)
            .ok_or_else(|| AppError::product_not_found(product_name.trim()))?;

        let today = today();
        let mut start_display = today.format(LABEL_DATE_FMT).to_string();
        let (_, mut expiry_display) = expiry_for(product, today);

        let caller_lot = caller_lot.map(lot::normalize_lot).unwrap_or_default();
        let resolved_lot = if !caller_lot.is_empty() {
            caller_lot
        } else if let Some(candidate) = fifo::select_latest(&snapshot.stock, &product.name)
            .filter(|row| row.lot != NOT_AVAILABLE)
        {
            // Reuse the open lot's dates where the sheet has them
            if let Some(date) = shared::util::parse_date_any(&candidate.start_date) {
                start_display = date.format(LABEL_DATE_FMT).to_string();
            }
            if let Some(date) = shared::util::parse_date_any(&candidate.expiry) {
                expiry_display = date.format(LABEL_DATE_FMT).to_string();
            }
            lot::normalize_lot(&candidate.lot)
        } else if product.category.is_internal() {
            lot::internal_lot_code(&product.code, today)
        } else {
            return Err(AppError::missing_lot(&product.name));
        };

        let content = LabelContent::new(
            product.name.clone(),
            start_display,
            expiry_display,
            resolved_lot,
        );
        Ok((content, clamp_copies(copies)))
    }

    /// Remove a quantity from a product, consuming its oldest rows first
    ///
    /// Returns how many units were actually removed, which is less than
    /// requested when the product runs out.
    #[instrument(skip(self))]
    pub async fn remove_by_product(&self, product_name: &str, quantity: i64) -> AppResult<i64> {
        if quantity < 1 {
            return Err(AppError::invalid_request("Quantity must be at least 1"));
        }

        let snapshot = self.cache.read(true).await;
        let handle = require_handle(&snapshot)?;
        let product = snapshot
            .find_product(product_name)
            .ok_or_else(|| AppError::product_not_found(product_name.trim()))?;

        let mut remaining = quantity;
        let mut removed = 0i64;
        let result: StoreResult<()> = async {
            for row in fifo::rows_oldest_first(&snapshot.stock, &product.name) {
                if remaining == 0 {
                    break;
                }
                let take = remaining.min(row.quantity);
                let new_quantity = row.quantity - take;
                self.store
                    .update_cell(
                        &handle,
                        row.row_id,
                        columns::QUANTITY as u32,
                        &new_quantity.to_string(),
                    )
                    .await?;
                remaining -= take;
                removed += take;
            }
            Ok(())
        }
        .await;

        self.cache.invalidate();
        result.map_err(AppError::from)?;

        info!(product = %product.name, requested = quantity, removed, "stock removed");
        Ok(removed)
    }

    /// Remove a quantity from one specific row, clamping at zero
    ///
    /// Returns the row's new quantity.
    #[instrument(skip(self))]
    pub async fn remove_by_row(&self, row_id: u32, quantity: i64) -> AppResult<i64> {
        if quantity < 1 {
            return Err(AppError::invalid_request("Quantity must be at least 1"));
        }
        validate_row_id(row_id)?;

        let snapshot = self.cache.read(true).await;
        let handle = require_handle(&snapshot)?;
        let row = snapshot
            .stock
            .iter()
            .find(|r| r.row_id == row_id)
            .ok_or_else(|| stock_row_not_found(row_id))?;

        let new_quantity = (row.quantity - quantity).max(0);
        let written = self
            .store
            .update_cell(
                &handle,
                row_id,
                columns::QUANTITY as u32,
                &new_quantity.to_string(),
            )
            .await;
        self.cache.invalidate();
        written.map_err(AppError::from)?;

        Ok(new_quantity)
    }

    /// Delete one stock row entirely
    #[instrument(skip(self))]
    pub async fn delete_row(&self, row_id: u32) -> AppResult<()> {
        validate_row_id(row_id)?;

        let snapshot = self.cache.read(true).await;
        let handle = require_handle(&snapshot)?;
        if !snapshot.stock.iter().any(|r| r.row_id == row_id) {
            return Err(stock_row_not_found(row_id));
        }

        let deleted = self.store.delete_row(&handle, row_id).await;
        self.cache.invalidate();
        deleted.map_err(AppError::from)?;

        info!(row_id, "stock row deleted");
        Ok(())
    }

    /// Delete every data row in the stock sheet
    ///
    /// Rows are deleted from the bottom up so earlier deletions do not
    /// shift the positions still to be deleted. Returns the row count.
    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> AppResult<usize> {
        let snapshot = self.cache.read(true).await;
        let handle = require_handle(&snapshot)?;

        // Raw count, not the cleaned snapshot: dirty rows must go too
        let raw_rows = self
            .store
            .read_stock_rows(&handle)
            .await
            .map_err(AppError::from)?;
        let total = raw_rows.len() as u32;

        let mut deleted = 0usize;
        let result: StoreResult<()> = async {
            for row_id in (FIRST_DATA_ROW..=total).rev() {
                self.store.delete_row(&handle, row_id).await?;
                deleted += 1;
            }
            Ok(())
        }
        .await;

        self.cache.invalidate();
        result.map_err(AppError::from)?;

        info!(deleted, "stock sheet cleared");
        Ok(deleted)
    }

    /// Fold the delta into the matching row or append a new one
    ///
    /// A fold also stamps the row's expiry cell with the caller's expiry,
    /// so a line run resets an open shelf-life row to same-day.
    async fn persist_delta(
        &self,
        handle: &StoreHandle,
        snapshot: &Snapshot,
        product: &ProductRecord,
        resolved_lot: &str,
        quantity: i64,
        today: NaiveDate,
        expiry_store: &str,
    ) -> StoreResult<Option<u32>> {
        let existing = snapshot.stock.iter().find(|row| {
            row.matches_product(&product.name) && lot::normalize_lot(&row.lot) == resolved_lot
        });

        if let Some(row) = existing {
            let new_quantity = row.quantity + quantity;
            self.store
                .update_cell(
                    handle,
                    row.row_id,
                    columns::QUANTITY as u32,
                    &new_quantity.to_string(),
                )
                .await?;
            self.store
                .update_cell(handle, row.row_id, columns::EXPIRY as u32, expiry_store)
                .await?;
            return Ok(Some(row.row_id));
        }

        let values = vec![
            product.name.clone(),
            quantity.to_string(),
            DEFAULT_PACKAGING.to_string(),
            String::new(),
            resolved_lot.to_string(),
            expiry_store.to_string(),
            today.format(STORE_DATE_FMT).to_string(),
        ];
        self.store.append_row(handle, &values).await?;
        Ok(None)
    }
}

/// Resolve the lot for one line item
///
/// Internal products always get a generated lot; whatever the caller sent
/// is ignored. External products take the caller's lot normalized, then
/// the newest open lot in stock, and fail with `MissingLot` when neither
/// exists.
fn resolve_lot(
    product: &ProductRecord,
    caller_lot: Option<&str>,
    stock: &[shared::StockRow],
    today: NaiveDate,
) -> AppResult<String> {
    if product.category.is_internal() {
        return Ok(lot::internal_lot_code(&product.code, today));
    }

    let caller_lot = caller_lot.map(lot::normalize_lot).unwrap_or_default();
    if !caller_lot.is_empty() {
        return Ok(caller_lot);
    }

    if let Some(row) = fifo::select_latest(stock, &product.name).filter(|r| r.lot != NOT_AVAILABLE)
    {
        let normalized = lot::normalize_lot(&row.lot);
        if !normalized.is_empty() {
            return Ok(normalized);
        }
    }

    Err(AppError::missing_lot(&product.name))
}

/// Expiry as (store value, display value)
///
/// Products without a shelf life have no expiry: empty cell in the sheet,
/// "N/D" on the label.
fn expiry_for(product: &ProductRecord, today: NaiveDate) -> (String, String) {
    match product
        .shelf_life_days
        .filter(|d| *d >= 0)
        .and_then(|d| today.checked_add_days(Days::new(d as u64)))
    {
        Some(date) => (
            date.format(STORE_DATE_FMT).to_string(),
            date.format(LABEL_DATE_FMT).to_string(),
        ),
        None => (String::new(), NOT_AVAILABLE.to_string()),
    }
}

/// One label page per unit, clamped to the copy limit
fn copies_for_quantity(quantity: i64) -> u32 {
    quantity.clamp(1, i64::from(MAX_LABEL_COPIES)) as u32
}

fn require_handle(snapshot: &Snapshot) -> AppResult<StoreHandle> {
    snapshot
        .handle
        .clone()
        .ok_or_else(AppError::store_unavailable)
}

fn validate_row_id(row_id: u32) -> AppResult<()> {
    if row_id < FIRST_DATA_ROW {
        return Err(AppError::invalid_request(format!(
            "Row {} is not a data row",
            row_id
        )));
    }
    Ok(())
}

fn stock_row_not_found(row_id: u32) -> AppError {
    AppError::with_message(
        ErrorCode::StockRowNotFound,
        format!("Stock row {} not found", row_id),
    )
    .with_detail("row_id", row_id)
}
