//! Snapshot cache API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/cache/status", get(handler::status))
        .route("/api/cache/refresh", post(handler::refresh))
}
