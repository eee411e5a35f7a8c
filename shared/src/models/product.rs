//! Catalog product model
//!
//! Catalog rows arrive as header-keyed string maps from the remote store and
//! are maintained by hand, so every field goes through an explicit
//! canonicalization step with a documented token table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A raw header-keyed row as read from the remote store
pub type Record = HashMap<String, String>;

/// Header of the product name column
pub const PRODUCT_HEADER: &str = "PRODUCT";
/// Header of the category column
pub const CATEGORY_HEADER: &str = "CATEGORY";
/// Header of the short product code column
pub const CODE_HEADER: &str = "CODE";
/// Header of the daily-required flag column
pub const DAILY_REQUIRED_HEADER: &str = "DAILY_REQUIRED";
/// Header of the line-quantity column
pub const LINE_QTY_HEADER: &str = "LINE_QTY";

/// Alternate headers for the shelf-life column, first non-empty wins
///
/// The sheet has been renamed over the years; old copies still circulate.
pub const SHELF_LIFE_HEADERS: [&str; 5] = [
    "SHELF_LIFE_DAYS",
    "EXPIRY_DAYS",
    "SHELF_LIFE",
    "KEEP_DAYS",
    "DURATION_DAYS",
];

/// Short code used in internally generated lot identifiers when the
/// catalog does not supply one
pub const DEFAULT_PRODUCT_CODE: &str = "XX";

/// Product category
///
/// Internal products are produced in-house and get system-generated lots;
/// external products are received from suppliers and carry supplier lots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Internal,
    #[default]
    External,
}

impl Category {
    /// Canonicalize a free-text category value
    ///
    /// Any value containing the substring `intern` (case-insensitive) is
    /// internal; everything else, including empty, is external.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().to_lowercase().contains("intern") {
            Self::Internal
        } else {
            Self::External
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Parse a free-text boolean cell
///
/// Token table (case-insensitive, trimmed): `yes`, `y`, `true`, `1`,
/// `si`, `sì`. Anything else is false. The Italian tokens stay because the
/// production sheets are still filled in by the original kitchen crew.
pub fn parse_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "yes" | "y" | "true" | "1" | "si" | "sì"
    )
}

/// One product from the catalog sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Display name, also the case-insensitive lookup key
    pub name: String,
    pub category: Category,
    /// Short alphanumeric tag used in internal lot codes
    pub code: String,
    /// Days the product keeps from production/receipt, if known
    pub shelf_life_days: Option<i64>,
    /// Whether the product must be on the production line every day
    pub daily_required: bool,
    /// How many pieces one line run produces
    pub line_quantity: u32,
}

impl ProductRecord {
    /// Build a product from a raw header-keyed record
    ///
    /// Returns `None` when the name cell is empty (blank rows are common at
    /// the bottom of the sheet).
    pub fn from_record(record: &Record) -> Option<Self> {
        let name = record.get(PRODUCT_HEADER)?.trim();
        if name.is_empty() {
            return None;
        }

        let code = record
            .get(CODE_HEADER)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_PRODUCT_CODE)
            .to_string();

        Some(Self {
            name: name.to_string(),
            category: Category::parse(record.get(CATEGORY_HEADER).map_or("", |s| s.as_str())),
            code,
            shelf_life_days: parse_shelf_life(record),
            daily_required: parse_truthy(
                record.get(DAILY_REQUIRED_HEADER).map_or("", |s| s.as_str()),
            ),
            line_quantity: record
                .get(LINE_QTY_HEADER)
                .and_then(|v| v.trim().parse().ok())
                .filter(|&q| q >= 1)
                .unwrap_or(1),
        })
    }

    /// Case-insensitive name match against a trimmed lookup key
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

/// Read the shelf-life in days from the first non-empty alternate header
///
/// Accepts integers and decimal-comma values ("7,5" → 7); unparsable cells
/// fall through to the next header.
fn parse_shelf_life(record: &Record) -> Option<i64> {
    for key in SHELF_LIFE_HEADERS {
        if let Some(raw) = record.get(key) {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            if let Ok(days) = raw.replace(',', ".").parse::<f64>() {
                return Some(days as i64);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("internal"), Category::Internal);
        assert_eq!(Category::parse("  INTERNAL  "), Category::Internal);
        assert_eq!(Category::parse("interno"), Category::Internal);
        assert_eq!(Category::parse("external"), Category::External);
        assert_eq!(Category::parse("supplier"), Category::External);
        assert_eq!(Category::parse(""), Category::External);
    }

    #[test]
    fn test_parse_truthy_tokens() {
        for token in ["yes", "Y", "TRUE", "1", "si", "Sì", " yes "] {
            assert!(parse_truthy(token), "expected truthy: {token:?}");
        }
        for token in ["no", "0", "false", "", "maybe"] {
            assert!(!parse_truthy(token), "expected falsy: {token:?}");
        }
    }

    #[test]
    fn test_from_record_defaults() {
        let p = ProductRecord::from_record(&record(&[("PRODUCT", "Yogurt")])).unwrap();
        assert_eq!(p.name, "Yogurt");
        assert_eq!(p.category, Category::External);
        assert_eq!(p.code, "XX");
        assert_eq!(p.shelf_life_days, None);
        assert!(!p.daily_required);
        assert_eq!(p.line_quantity, 1);
    }

    #[test]
    fn test_from_record_full() {
        let p = ProductRecord::from_record(&record(&[
            ("PRODUCT", " Fresh Cream "),
            ("CATEGORY", "Internal production"),
            ("CODE", "FC"),
            ("SHELF_LIFE_DAYS", "10"),
            ("DAILY_REQUIRED", "si"),
            ("LINE_QTY", "4"),
        ]))
        .unwrap();
        assert_eq!(p.name, "Fresh Cream");
        assert_eq!(p.category, Category::Internal);
        assert_eq!(p.code, "FC");
        assert_eq!(p.shelf_life_days, Some(10));
        assert!(p.daily_required);
        assert_eq!(p.line_quantity, 4);
    }

    #[test]
    fn test_from_record_blank_row() {
        assert!(ProductRecord::from_record(&record(&[("PRODUCT", "   ")])).is_none());
        assert!(ProductRecord::from_record(&record(&[])).is_none());
    }

    #[test]
    fn test_shelf_life_alternate_headers() {
        let p = ProductRecord::from_record(&record(&[
            ("PRODUCT", "Ricotta"),
            ("SHELF_LIFE_DAYS", ""),
            ("KEEP_DAYS", "5"),
        ]))
        .unwrap();
        assert_eq!(p.shelf_life_days, Some(5));
    }

    #[test]
    fn test_shelf_life_decimal_comma() {
        let p = ProductRecord::from_record(&record(&[
            ("PRODUCT", "Ricotta"),
            ("SHELF_LIFE", "7,5"),
        ]))
        .unwrap();
        assert_eq!(p.shelf_life_days, Some(7));
    }

    #[test]
    fn test_matches_name() {
        let p = ProductRecord::from_record(&record(&[("PRODUCT", "Yogurt")])).unwrap();
        assert!(p.matches_name("yogurt"));
        assert!(p.matches_name("  YOGURT  "));
        assert!(!p.matches_name("yogur"));
    }
}
