//! HTTP spreadsheet store backend
//!
//! Talks the Sheets values REST API: range reads, single-cell updates, row
//! appends and `batchUpdate` row deletions, authenticated with a bearer
//! token. One `reqwest` client is shared across requests.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

use super::{StoreError, StoreHandle, StoreResult, TabularStore, rows_to_records};
use crate::core::Config;
use shared::models::Record;

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Remote spreadsheet client
pub struct SheetStore {
    client: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    api_token: String,
    products_range: String,
    stock_range: String,
    /// Numeric sheet id of the stock tab, required by deleteDimension
    stock_sheet_gid: u64,
}

impl SheetStore {
    /// Build a store client from the server configuration
    ///
    /// Returns `None` when the spreadsheet id or the API token is not
    /// configured; the caller falls back to the in-memory store.
    pub fn from_config(config: &Config) -> Option<Self> {
        let spreadsheet_id = config.spreadsheet_id.clone()?;
        let api_token = config.store_api_token.clone()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .ok()?;

        Some(Self {
            client,
            base_url: config.store_base_url.trim_end_matches('/').to_string(),
            spreadsheet_id,
            api_token,
            products_range: config.products_range.clone(),
            stock_range: config.stock_range.clone(),
            stock_sheet_gid: config.stock_sheet_gid,
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url, self.spreadsheet_id, range
        )
    }

    async fn read_range(&self, range: &str) -> StoreResult<Vec<Vec<String>>> {
        let response = self
            .client
            .get(self.values_url(range))
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: ValuesResponse = response.json().await?;
        Ok(body.values)
    }
}

async fn check_status(response: reqwest::Response) -> StoreResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

/// A1 notation for a single cell (`row` 1-based, `col` 0-based)
fn a1_cell(row: u32, col: u32) -> String {
    let mut letters = String::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    format!("{}{}", letters, row)
}

#[async_trait]
impl TabularStore for SheetStore {
    #[instrument(skip(self))]
    async fn open_catalog(&self) -> StoreResult<StoreHandle> {
        // Cheap reachability probe before handing out a handle
        let url = format!(
            "{}/v4/spreadsheets/{}?fields=spreadsheetId",
            self.base_url, self.spreadsheet_id
        );
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        check_status(response).await?;

        debug!(spreadsheet = %self.spreadsheet_id, "catalog opened");
        Ok(StoreHandle::new(&self.spreadsheet_id))
    }

    async fn read_products(&self, _handle: &StoreHandle) -> StoreResult<Vec<Record>> {
        let rows = self.read_range(&self.products_range).await?;
        Ok(rows_to_records(&rows))
    }

    async fn read_stock_rows(&self, _handle: &StoreHandle) -> StoreResult<Vec<Vec<String>>> {
        self.read_range(&self.stock_range).await
    }

    #[instrument(skip(self, _handle, value))]
    async fn update_cell(
        &self,
        _handle: &StoreHandle,
        row_id: u32,
        col: u32,
        value: &str,
    ) -> StoreResult<()> {
        let sheet = sheet_name(&self.stock_range);
        let range = format!("{}!{}", sheet, a1_cell(row_id, col));
        let url = format!("{}?valueInputOption=USER_ENTERED", self.values_url(&range));

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.api_token)
            .json(&json!({ "values": [[value]] }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, _handle, values), fields(cells = values.len()))]
    async fn append_row(&self, _handle: &StoreHandle, values: &[String]) -> StoreResult<()> {
        let url = format!(
            "{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            self.values_url(&self.stock_range)
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(&json!({ "values": [values] }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, _handle))]
    async fn delete_row(&self, _handle: &StoreHandle, row_id: u32) -> StoreResult<()> {
        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.base_url, self.spreadsheet_id
        );
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": self.stock_sheet_gid,
                        "dimension": "ROWS",
                        "startIndex": row_id - 1,
                        "endIndex": row_id
                    }
                }
            }]
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Sheet tab name from a range spec ("Stock!A1:Z" -> "Stock")
fn sheet_name(range: &str) -> &str {
    range.split('!').next().unwrap_or(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a1_cell() {
        assert_eq!(a1_cell(1, 0), "A1");
        assert_eq!(a1_cell(7, 1), "B7");
        assert_eq!(a1_cell(2, 25), "Z2");
        assert_eq!(a1_cell(3, 26), "AA3");
    }

    #[test]
    fn test_sheet_name() {
        assert_eq!(sheet_name("Stock!A1:Z"), "Stock");
        assert_eq!(sheet_name("Stock"), "Stock");
    }
}
