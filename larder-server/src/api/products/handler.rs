//! Product catalog handlers

use axum::extract::State;

use crate::core::ServerState;
use shared::{ApiResponse, AppError, AppResult, ProductRecord};

/// GET /api/products - the catalog, sorted by name
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<ProductRecord>>> {
    let snapshot = state.cache.read(false).await;
    if snapshot.handle.is_none() {
        return Err(AppError::store_unavailable());
    }

    let mut products = snapshot.products.clone();
    products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(ApiResponse::success(products))
}
