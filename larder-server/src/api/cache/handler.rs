//! Cache status and refresh handlers

use axum::extract::State;

use crate::cache::CacheStatus;
use crate::core::ServerState;
use shared::{ApiResponse, AppError, AppResult};

/// GET /api/cache/status
pub async fn status(State(state): State<ServerState>) -> ApiResponse<CacheStatus> {
    ApiResponse::success(state.cache.status())
}

/// POST /api/cache/refresh - force a fetch, reporting the new state
pub async fn refresh(State(state): State<ServerState>) -> AppResult<ApiResponse<CacheStatus>> {
    let snapshot = state.cache.read(true).await;
    if snapshot.handle.is_none() {
        return Err(AppError::store_unavailable());
    }
    Ok(ApiResponse::success_with_message(
        "Cache refreshed",
        state.cache.status(),
    ))
}
