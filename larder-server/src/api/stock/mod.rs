//! Stock API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stock", stock_routes())
}

fn stock_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::summary))
        .route("/add", post(handler::add))
        .route("/remove", post(handler::remove_by_product))
        .route("/clear", post(handler::clear))
        .route("/rows/remove", post(handler::remove_by_row))
        .route("/rows/{row_id}/delete", post(handler::delete_row))
        .route("/{name}", get(handler::rows_for_product))
}
