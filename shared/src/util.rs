//! Date and time helpers shared across the service
//!
//! The remote store holds dates as free-form strings maintained by hand, so
//! parsing is deliberately permissive: ISO first, then the day-first format
//! the kitchen staff types.

use chrono::NaiveDate;

/// Display format used on printed labels (day-first)
pub const LABEL_DATE_FMT: &str = "%d/%m/%Y";

/// Storage format used in the remote store (ISO)
pub const STORE_DATE_FMT: &str = "%Y-%m-%d";

/// Parse a date accepting either `YYYY-MM-DD` or `DD/MM/YYYY`
///
/// Returns `None` for anything else, including the "N/D" sentinel.
pub fn parse_date_any(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in [STORE_DATE_FMT, LABEL_DATE_FMT] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    None
}

/// Today's date in the server's local timezone
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Current local timestamp formatted for content-disposition filenames
pub fn filename_stamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M").to_string()
}
