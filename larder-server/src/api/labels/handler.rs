//! Label printing handlers
//!
//! The JSON body goes in, TSPL bytes come out. Successful print endpoints
//! answer `application/octet-stream` with a timestamped filename; when a
//! network printer is configured the same document is also pushed to it,
//! best effort.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use http::header;
use serde::Deserialize;
use tracing::warn;

use crate::core::ServerState;
use crate::inventory::{LineOrder, LinePlanItem};
use larder_printer::{LabelContent, Printer, render_document};
use shared::util::filename_stamp;
use shared::{ApiResponse, AppResult};

#[derive(Debug, Deserialize)]
pub struct PrintRequest {
    pub product_name: String,
    pub quantity: i64,
    pub lot: Option<String>,
    /// One page per unit when omitted
    #[serde(default)]
    pub copies: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ReprintRequest {
    pub product_name: String,
    pub lot: Option<String>,
    #[serde(default = "default_copies")]
    pub copies: u32,
}

#[derive(Debug, Deserialize)]
pub struct LinePrintRequest {
    pub items: Vec<LineOrder>,
}

fn default_copies() -> u32 {
    1
}

/// POST /api/labels/print - record stock and return the label document
pub async fn print(
    State(state): State<ServerState>,
    Json(req): Json<PrintRequest>,
) -> AppResult<Response> {
    let (content, copies) = state
        .inventory
        .print_label(&req.product_name, req.quantity, req.lot.as_deref(), req.copies)
        .await?;
    Ok(label_document(&state, vec![(content, copies)]))
}

/// GET /api/labels/line - the daily production batch
pub async fn line_plan(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<LinePlanItem>>> {
    let plan = state.inventory.line_plan().await?;
    Ok(ApiResponse::success(plan))
}

/// POST /api/labels/line/print - commit the batch and return its labels
pub async fn line_print(
    State(state): State<ServerState>,
    Json(req): Json<LinePrintRequest>,
) -> AppResult<Response> {
    let labels = state.inventory.line_print(&req.items).await?;
    Ok(label_document(&state, labels))
}

/// POST /api/labels/reprint - rebuild a label without touching stock
pub async fn reprint(
    State(state): State<ServerState>,
    Json(req): Json<ReprintRequest>,
) -> AppResult<Response> {
    let (content, copies) = state
        .inventory
        .reprint(&req.product_name, req.lot.as_deref(), req.copies)
        .await?;
    Ok(label_document(&state, vec![(content, copies)]))
}

/// Render the TSPL document, push it to the printer when one is
/// configured, and wrap it as a download
fn label_document(state: &ServerState, items: Vec<(LabelContent, u32)>) -> Response {
    let doc = render_document(&items, state.logo.as_deref());

    if let Some(printer) = state.printer.clone() {
        let data = doc.clone();
        tokio::spawn(async move {
            if let Err(e) = printer.print(&data).await {
                warn!(error = %e, "printer push failed, document still served");
            }
        });
    }

    let filename = format!("labels_{}.tspl", filename_stamp());
    (
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        doc,
    )
        .into_response()
}
