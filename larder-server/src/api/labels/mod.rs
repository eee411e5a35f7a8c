//! Label printing API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/labels", label_routes())
}

fn label_routes() -> Router<ServerState> {
    Router::new()
        .route("/print", post(handler::print))
        .route("/line", get(handler::line_plan))
        .route("/line/print", post(handler::line_print))
        .route("/reprint", post(handler::reprint))
}
