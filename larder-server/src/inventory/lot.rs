//! Lot identifier rules
//!
//! Two families of lot codes exist:
//!
//! - internal lots are generated here for in-house production;
//! - external lots arrive from suppliers in whatever shape the paperwork
//!   had and get normalized to one canonical form.

use chrono::NaiveDate;

/// Generate the lot code for internally produced goods
///
/// Format: `L` + day + day + month + two-digit year + product code. The
/// duplicated day is intentional: years of printed labels and handwritten
/// registers carry it, so changing the format would orphan the archive.
pub fn internal_lot_code(product_code: &str, date: NaiveDate) -> String {
    format!("L{}{}", date.format("%d%d%m%y"), product_code)
}

/// Normalize a supplier-provided lot code
///
/// Trim, uppercase, and prefix `L` when missing. Empty input stays empty:
/// an absent lot must remain detectably absent.
pub fn normalize_lot(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let upper = trimmed.to_uppercase();
    if upper.starts_with('L') {
        upper
    } else {
        format!("L{}", upper)
    }
}
