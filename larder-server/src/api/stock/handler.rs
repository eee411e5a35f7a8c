//! Stock handlers
//!
//! Thin wrappers over the reconciliation engine; all business rules live
//! there.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::inventory::StockWrite;
use shared::models::StockSummary;
use shared::{ApiResponse, AppError, AppResult, StockRow};

#[derive(Debug, Deserialize)]
pub struct AddStockRequest {
    pub product_name: String,
    pub quantity: i64,
    pub lot: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveStockRequest {
    pub product_name: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct RemoveRowRequest {
    pub row_id: u32,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct RemovedInfo {
    pub removed: i64,
}

#[derive(Debug, Serialize)]
pub struct RemainingInfo {
    pub remaining: i64,
}

#[derive(Debug, Serialize)]
pub struct ClearedInfo {
    pub deleted: usize,
}

/// GET /api/stock - per-product aggregated quantities
pub async fn summary(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<StockSummary>>> {
    let snapshot = state.cache.read(false).await;
    if snapshot.handle.is_none() {
        return Err(AppError::store_unavailable());
    }
    Ok(ApiResponse::success(StockSummary::aggregate(&snapshot.stock)))
}

/// GET /api/stock/{name} - rows for one product
pub async fn rows_for_product(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<ApiResponse<Vec<StockRow>>> {
    let snapshot = state.cache.read(false).await;
    if snapshot.handle.is_none() {
        return Err(AppError::store_unavailable());
    }
    if snapshot.find_product(&name).is_none() {
        return Err(AppError::product_not_found(name.trim()));
    }

    let rows: Vec<StockRow> = snapshot
        .stock
        .iter()
        .filter(|row| row.matches_product(&name))
        .cloned()
        .collect();
    Ok(ApiResponse::success(rows))
}

/// POST /api/stock/add - record a received or produced quantity
pub async fn add(
    State(state): State<ServerState>,
    Json(req): Json<AddStockRequest>,
) -> AppResult<ApiResponse<StockWrite>> {
    let write = state
        .inventory
        .add_stock(&req.product_name, req.quantity, req.lot.as_deref())
        .await?;
    Ok(ApiResponse::success(write))
}

/// POST /api/stock/remove - consume a quantity oldest rows first
pub async fn remove_by_product(
    State(state): State<ServerState>,
    Json(req): Json<RemoveStockRequest>,
) -> AppResult<ApiResponse<RemovedInfo>> {
    let removed = state
        .inventory
        .remove_by_product(&req.product_name, req.quantity)
        .await?;
    Ok(ApiResponse::success(RemovedInfo { removed }))
}

/// POST /api/stock/rows/remove - subtract from one row, clamping at zero
pub async fn remove_by_row(
    State(state): State<ServerState>,
    Json(req): Json<RemoveRowRequest>,
) -> AppResult<ApiResponse<RemainingInfo>> {
    let remaining = state
        .inventory
        .remove_by_row(req.row_id, req.quantity)
        .await?;
    Ok(ApiResponse::success(RemainingInfo { remaining }))
}

/// POST /api/stock/rows/{row_id}/delete - drop one row entirely
pub async fn delete_row(
    State(state): State<ServerState>,
    Path(row_id): Path<u32>,
) -> AppResult<ApiResponse<()>> {
    state.inventory.delete_row(row_id).await?;
    Ok(ApiResponse::ok())
}

/// POST /api/stock/clear - delete every data row
pub async fn clear(State(state): State<ServerState>) -> AppResult<ApiResponse<ClearedInfo>> {
    let deleted = state.inventory.clear_all().await?;
    Ok(ApiResponse::success(ClearedInfo { deleted }))
}
