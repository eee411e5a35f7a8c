//! Stock rows and raw-sheet cleaning

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel for optional cells the sheet leaves blank
pub const NOT_AVAILABLE: &str = "N/D";

/// First data row in the stock sheet; row 1 holds the headers
pub const FIRST_DATA_ROW: u32 = 2;

/// Stock sheet column layout (0-indexed)
pub mod columns {
    pub const PRODUCT: usize = 0;
    pub const QUANTITY: usize = 1;
    pub const PACKAGING: usize = 2;
    pub const RESERVED: usize = 3;
    pub const LOT: usize = 4;
    pub const EXPIRY: usize = 5;
    pub const START_DATE: usize = 6;
}

/// Default packaging tag written on appended rows
pub const DEFAULT_PACKAGING: &str = "bag";

/// One cleaned stock row
///
/// `row_id` is the 1-based position in the remote sheet and is what the
/// write path uses to address cell updates and deletions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRow {
    pub row_id: u32,
    pub product_name: String,
    pub quantity: i64,
    pub lot: String,
    pub expiry: String,
    pub start_date: String,
}

impl StockRow {
    /// Clean one raw sheet row
    ///
    /// Returns `None` for rows the snapshot must not contain: empty product
    /// name, or quantity ≤ 0 (quantity cells that fail to parse count as 0).
    /// Missing optional cells default to the `N/D` sentinel.
    pub fn from_raw(row_id: u32, raw: &[String]) -> Option<Self> {
        let name = raw.first().map(|s| s.trim()).unwrap_or("");
        if name.is_empty() {
            return None;
        }

        let quantity: i64 = raw
            .get(columns::QUANTITY)
            .and_then(|q| q.trim().parse().ok())
            .unwrap_or(0);
        if quantity <= 0 {
            return None;
        }

        let cell = |idx: usize| -> String {
            raw.get(idx)
                .map(|s| s.as_str())
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string()
        };

        Some(Self {
            row_id,
            product_name: name.to_string(),
            quantity,
            lot: cell(columns::LOT),
            expiry: cell(columns::EXPIRY),
            start_date: cell(columns::START_DATE),
        })
    }

    /// Case-insensitive product match against a trimmed lookup key
    pub fn matches_product(&self, name: &str) -> bool {
        self.product_name.trim().eq_ignore_ascii_case(name.trim())
    }
}

/// Aggregated per-product quantity, for the warehouse overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSummary {
    pub product_name: String,
    pub total_quantity: i64,
}

impl StockSummary {
    /// Aggregate cleaned rows into per-product totals, sorted by name
    pub fn aggregate(rows: &[StockRow]) -> Vec<Self> {
        let mut totals: BTreeMap<String, i64> = BTreeMap::new();
        for row in rows {
            let name = row.product_name.trim().to_string();
            *totals.entry(name).or_insert(0) += row.quantity;
        }
        totals
            .into_iter()
            .map(|(product_name, total_quantity)| Self {
                product_name,
                total_quantity,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_from_raw_full_row() {
        let row = StockRow::from_raw(
            2,
            &raw(&["Yogurt", "5", "bag", "", "L123", "2024-03-10", "2024-03-01"]),
        )
        .unwrap();
        assert_eq!(row.row_id, 2);
        assert_eq!(row.product_name, "Yogurt");
        assert_eq!(row.quantity, 5);
        assert_eq!(row.lot, "L123");
        assert_eq!(row.expiry, "2024-03-10");
        assert_eq!(row.start_date, "2024-03-01");
    }

    #[test]
    fn test_from_raw_short_row_defaults() {
        let row = StockRow::from_raw(3, &raw(&["Yogurt", "2"])).unwrap();
        assert_eq!(row.lot, NOT_AVAILABLE);
        assert_eq!(row.expiry, NOT_AVAILABLE);
        assert_eq!(row.start_date, NOT_AVAILABLE);
    }

    #[test]
    fn test_from_raw_drops_empty_name() {
        assert!(StockRow::from_raw(2, &raw(&["", "5"])).is_none());
        assert!(StockRow::from_raw(2, &raw(&["   ", "5"])).is_none());
        assert!(StockRow::from_raw(2, &[]).is_none());
    }

    #[test]
    fn test_from_raw_drops_non_positive_quantity() {
        assert!(StockRow::from_raw(2, &raw(&["Yogurt", "0"])).is_none());
        assert!(StockRow::from_raw(2, &raw(&["Yogurt", "-3"])).is_none());
        // Unparsable quantity coerces to 0 and is dropped
        assert!(StockRow::from_raw(2, &raw(&["Yogurt", "many"])).is_none());
        assert!(StockRow::from_raw(2, &raw(&["Yogurt"])).is_none());
    }

    #[test]
    fn test_matches_product() {
        let row = StockRow::from_raw(2, &raw(&["Yogurt", "5"])).unwrap();
        assert!(row.matches_product(" yogurt "));
        assert!(!row.matches_product("cream"));
    }

    #[test]
    fn test_aggregate() {
        let rows = vec![
            StockRow::from_raw(2, &raw(&["Yogurt", "5"])).unwrap(),
            StockRow::from_raw(3, &raw(&["Cream", "2"])).unwrap(),
            StockRow::from_raw(4, &raw(&["yogurt ", "3"])).unwrap(),
        ];
        let summary = StockSummary::aggregate(&rows);
        assert_eq!(summary.len(), 3); // "Yogurt" and "yogurt" differ in case
        assert_eq!(summary[0].product_name, "Cream");
        assert_eq!(summary[0].total_quantity, 2);
    }
}
