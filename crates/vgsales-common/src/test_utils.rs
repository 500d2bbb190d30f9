//! Test utilities and shared fixtures for the dashboard crates.
//!
//! Enabled for this crate's own tests and, through the `testing` feature, for
//! the dev-dependencies of every other crate in the workspace.

use crate::{SalesRecord, SalesTable};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Create a temporary file holding `contents` that cleans up on drop.
#[cfg(feature = "testing")]
pub fn create_temp_file(contents: &str) -> tempfile::NamedTempFile {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temporary file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temporary file");
    file
}

/// Record fixtures.
pub mod sales_fixtures {
    use super::{SalesRecord, SalesTable};

    /// Builds a record with North America sales only; other regions absent and
    /// global equal to `na`.
    pub fn record(name: &str, platform: &str, year: i32, genre: &str, na: f64) -> SalesRecord {
        SalesRecord {
            name: name.to_string(),
            platform: platform.to_string(),
            year,
            genre: genre.to_string(),
            publisher: "Nintendo".to_string(),
            na_sales: Some(na),
            eu_sales: None,
            jp_sales: None,
            other_sales: None,
            global_sales: Some(na),
        }
    }

    /// Builds a record with every region populated.
    #[allow(clippy::too_many_arguments)]
    pub fn full_record(
        name: &str,
        platform: &str,
        year: i32,
        genre: &str,
        na: f64,
        eu: f64,
        jp: f64,
        other: f64,
    ) -> SalesRecord {
        SalesRecord {
            name: name.to_string(),
            platform: platform.to_string(),
            year,
            genre: genre.to_string(),
            publisher: "Nintendo".to_string(),
            na_sales: Some(na),
            eu_sales: Some(eu),
            jp_sales: Some(jp),
            other_sales: Some(other),
            global_sales: Some(na + eu + jp + other),
        }
    }

    /// A small, normalized table spanning several platforms, genres and years.
    pub fn sample_table() -> SalesTable {
        SalesTable::new(vec![
            full_record("Wii Sports", "Wii", 2006, "Sports", 41.49, 29.02, 3.77, 8.46),
            full_record("Super Mario Bros.", "NES", 1985, "Platform", 29.08, 3.58, 6.81, 0.77),
            full_record("Mario Kart Wii", "Wii", 2008, "Racing", 15.85, 12.88, 3.79, 3.31),
            full_record("Tetris", "GB", 1989, "Puzzle", 23.20, 2.26, 4.22, 0.58),
            full_record("Tetris", "NES", 1988, "Puzzle", 2.97, 0.69, 1.81, 0.11),
            full_record("Grand Theft Auto V", "PS3", 2013, "Action", 7.01, 9.27, 0.97, 4.14),
            full_record("Grand Theft Auto V", "X360", 2013, "Action", 9.63, 5.31, 0.06, 1.38),
            full_record("Pokemon Red/Pokemon Blue", "GB", 1996, "Role-Playing", 11.27, 8.89, 10.22, 1.00),
            full_record("Brain Age", "DS", 2005, "Misc", 4.75, 9.26, 4.16, 2.05),
            full_record("Final Fantasy VII", "PS", 1997, "Role-Playing", 3.01, 2.47, 3.28, 0.96),
            full_record("Obscure Racer", "PCFX", 1996, "Racing", 0.0, 0.0, 0.03, 0.0),
        ])
    }

    /// CSV text in the dataset's column layout, including a `Rank` column, a
    /// record with an unknown year and a record with a blank sales value.
    pub fn sample_csv() -> &'static str {
        concat!(
            "Rank,Name,Platform,Year,Genre,Publisher,NA_Sales,EU_Sales,JP_Sales,Other_Sales,Global_Sales\n",
            "1,Wii Sports,Wii,2006,Sports,Nintendo,41.49,29.02,3.77,8.46,82.74\n",
            "2,Super Mario Bros.,NES,1985,Platform,Nintendo,29.08,3.58,6.81,0.77,40.24\n",
            "3,Mario Kart Wii,Wii,2008.0,Racing,Nintendo,15.85,12.88,3.79,3.31,35.82\n",
            "4,\"Tetris, Deluxe\",GB,1989,Puzzle,Nintendo,23.2,2.26,4.22,0.58,30.26\n",
            "5,Madden NFL 2004,PS2,N/A,Sports,Electronic Arts,4.26,0.26,0.01,0.71,5.23\n",
            "6,Brain Age,DS,2005,Misc,Nintendo,4.75,,4.16,2.05,20.22\n",
        )
    }
}

/// Property-based testing strategies using proptest.
#[cfg(feature = "testing")]
pub mod property_testing {
    use crate::SalesRecord;
    use proptest::prelude::*;

    /// Strategy for platform codes drawn from a small pool so groups collide.
    pub fn platform_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["Wii", "NES", "GB", "PS2", "X360", "DS"]).prop_map(str::to_string)
    }

    /// Strategy for genres drawn from a small pool.
    pub fn genre_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["Sports", "Puzzle", "Action", "Racing"]).prop_map(str::to_string)
    }

    /// Strategy for optional sales values, including absent and non-positive ones.
    pub fn sales_strategy() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![
            1 => Just(None),
            1 => Just(Some(0.0)),
            1 => (-5.0f64..0.0).prop_map(Some),
            6 => (0.01f64..50.0).prop_map(Some),
        ]
    }

    /// Strategy for records with a valid (positive) release year.
    pub fn record_strategy() -> impl Strategy<Value = SalesRecord> {
        (
            prop::sample::select(vec!["Tetris", "Zelda", "Halo", "Doom", "Pong"]),
            platform_strategy(),
            1980i32..2020,
            genre_strategy(),
            sales_strategy(),
            sales_strategy(),
        )
            .prop_map(|(name, platform, year, genre, na, global)| SalesRecord {
                name: name.to_string(),
                platform,
                year,
                genre,
                publisher: "Publisher".to_string(),
                na_sales: na,
                eu_sales: None,
                jp_sales: None,
                other_sales: None,
                global_sales: global,
            })
    }

    /// Strategy for a vector of records.
    pub fn records_strategy(max_len: usize) -> impl Strategy<Value = Vec<SalesRecord>> {
        prop::collection::vec(record_strategy(), 0..max_len)
    }
}
