//! Release-year normalization.
//!
//! Years are accepted when they are integers (`2006`) or integral floats
//! (`2006.0`); anything else maps to the sentinel [`UNKNOWN_YEAR`]. Rows whose
//! year ends up non-positive are dropped and counted.

use crate::loader::RawRecord;
use tracing::{debug, instrument, warn};
use vgsales_common::{SalesRecord, SalesTable, YearRange};

/// Sentinel for a missing or malformed release year.
pub const UNKNOWN_YEAR: i32 = 0;

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    /// Records with a positive release year, in load order.
    pub table: SalesTable,
    /// Smallest range covering every remaining year; `None` when no record
    /// survived.
    pub year_range: Option<YearRange>,
    /// Number of rows discarded for lacking a valid year.
    pub dropped: usize,
}

/// Parses a raw year value, returning [`UNKNOWN_YEAR`] when it is not
/// expressible as an integer.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_year(raw: &str) -> i32 {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return year;
    }

    match raw.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value.fract() == 0.0
                && value >= f64::from(i32::MIN)
                && value <= f64::from(i32::MAX) =>
        {
            value as i32
        }
        _ => UNKNOWN_YEAR,
    }
}

/// Converts raw rows into a sales table, dropping rows without a valid year.
#[instrument(skip(rows), fields(rows = rows.len()))]
pub fn normalize(rows: Vec<RawRecord>) -> NormalizedTable {
    let total = rows.len();
    let table: SalesTable = rows
        .into_iter()
        .filter_map(|row| {
            let year = parse_year(&row.year);
            (year > 0).then(|| SalesRecord {
                name: row.name,
                platform: row.platform,
                year,
                genre: row.genre,
                publisher: row.publisher,
                na_sales: row.na_sales,
                eu_sales: row.eu_sales,
                jp_sales: row.jp_sales,
                other_sales: row.other_sales,
                global_sales: row.global_sales,
            })
        })
        .collect();

    let dropped = total - table.len();
    let year_range = YearRange::spanning(table.iter().map(|record| record.year));

    if dropped > 0 {
        warn!("Dropped {} rows without a release year", dropped);
    }
    match year_range {
        Some(range) => debug!("Valid years: {}", range),
        None => warn!("No rows with a valid release year"),
    }

    NormalizedTable {
        table,
        year_range,
        dropped,
    }
}
