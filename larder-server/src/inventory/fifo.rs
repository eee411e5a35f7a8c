//! FIFO lot selection over cleaned stock rows

use chrono::NaiveDate;
use shared::StockRow;
use shared::util::parse_date_any;

/// Sort key: permissively parsed start date, unparsable rows sink to the
/// bottom; ties break on sheet position.
fn recency_key(row: &StockRow) -> (NaiveDate, u32) {
    (
        parse_date_any(&row.start_date).unwrap_or(NaiveDate::MIN),
        row.row_id,
    )
}

/// Pick the most recently started stock row for a product
///
/// Used when a print request names a product but no lot: the newest open
/// lot is the one currently in use. Date formats in the sheet are mixed,
/// so both ISO and day-first are accepted; rows without a parsable start
/// date are considered oldest.
pub fn select_latest<'a>(stock: &'a [StockRow], product_name: &str) -> Option<&'a StockRow> {
    stock
        .iter()
        .filter(|row| row.matches_product(product_name))
        .max_by_key(|row| recency_key(row))
}

/// The same product's rows ordered oldest first, for quantity consumption
pub fn rows_oldest_first<'a>(stock: &'a [StockRow], product_name: &str) -> Vec<&'a StockRow> {
    let mut rows: Vec<&StockRow> = stock
        .iter()
        .filter(|row| row.matches_product(product_name))
        .collect();
    rows.sort_by_key(|row| consumption_key(row));
    rows
}

/// Oldest-first key for removal; unparsable dates count as today so
/// unknown rows are consumed last among the dated ones.
fn consumption_key(row: &StockRow) -> (NaiveDate, u32) {
    (
        parse_date_any(&row.start_date).unwrap_or_else(shared::util::today),
        row.row_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(row_id: u32, name: &str, start_date: &str) -> StockRow {
        StockRow {
            row_id,
            product_name: name.to_string(),
            quantity: 1,
            lot: format!("L{}", row_id),
            expiry: "N/D".to_string(),
            start_date: start_date.to_string(),
        }
    }

    #[test]
    fn test_latest_across_mixed_formats() {
        // Day-first March beats ISO January
        let stock = vec![row(2, "Yogurt", "2024-01-01"), row(3, "Yogurt", "01/03/2024")];
        assert_eq!(select_latest(&stock, "Yogurt").unwrap().row_id, 3);
    }

    #[test]
    fn test_unparsable_date_sinks() {
        let stock = vec![row(2, "Yogurt", "soon"), row(3, "Yogurt", "2020-01-01")];
        assert_eq!(select_latest(&stock, "Yogurt").unwrap().row_id, 3);
    }

    #[test]
    fn test_tiebreak_on_row_id() {
        let stock = vec![row(2, "Yogurt", "2024-03-01"), row(5, "Yogurt", "2024-03-01")];
        assert_eq!(select_latest(&stock, "Yogurt").unwrap().row_id, 5);
    }

    #[test]
    fn test_case_insensitive_match() {
        let stock = vec![row(2, "Yogurt", "2024-03-01")];
        assert!(select_latest(&stock, "  yogurt ").is_some());
        assert!(select_latest(&stock, "Cream").is_none());
    }

    #[test]
    fn test_oldest_first_for_consumption() {
        let stock = vec![
            row(2, "Yogurt", "01/03/2024"),
            row(3, "Yogurt", "2024-01-01"),
            row(4, "Yogurt", "2024-02-01"),
        ];
        let ordered: Vec<u32> = rows_oldest_first(&stock, "Yogurt")
            .iter()
            .map(|r| r.row_id)
            .collect();
        assert_eq!(ordered, vec![3, 4, 2]);
    }
}
