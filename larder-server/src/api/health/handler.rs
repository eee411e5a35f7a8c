//! Health check handler

use axum::extract::State;
use serde::Serialize;

use crate::core::ServerState;
use shared::ApiResponse;

#[derive(Serialize)]
pub struct HealthInfo {
    status: &'static str,
    version: &'static str,
    environment: String,
}

/// GET /api/health
pub async fn health(State(state): State<ServerState>) -> ApiResponse<HealthInfo> {
    ApiResponse::success(HealthInfo {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
    })
}
