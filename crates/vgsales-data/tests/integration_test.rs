//! Integration tests for vgsales-data

use proptest::prelude::*;
use vgsales_common::test_utils::{create_temp_file, sales_fixtures};
use vgsales_common::YearRange;
use vgsales_data::{normalize, parse_year, DataLoader, RawRecord, UNKNOWN_YEAR};

#[test]
fn test_load_and_normalize_sample_file() {
    let file = create_temp_file(sales_fixtures::sample_csv());
    let rows = DataLoader::new().load_path(file.path()).unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[3].name, "Tetris, Deluxe");

    let normalized = normalize(rows);
    assert_eq!(normalized.dropped, 1);
    assert_eq!(normalized.table.len(), 5);
    assert_eq!(
        normalized.year_range,
        Some(YearRange { min: 1985, max: 2008 })
    );
    assert!(normalized
        .table
        .iter()
        .all(|record| record.name != "Madden NFL 2004"));

    let brain_age = normalized
        .table
        .iter()
        .find(|record| record.name == "Brain Age")
        .unwrap();
    assert_eq!(brain_age.eu_sales, None);
    assert_eq!(brain_age.jp_sales, Some(4.16));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = DataLoader::new()
        .load_path(dir.path().join("absent.csv"))
        .unwrap_err();
    assert!(err.to_string().contains("Cannot open dataset"));
}

fn raw_with_year(year: String) -> RawRecord {
    RawRecord {
        name: "Game".to_string(),
        platform: "Wii".to_string(),
        year,
        genre: "Sports".to_string(),
        publisher: "Nintendo".to_string(),
        na_sales: Some(1.0),
        eu_sales: None,
        jp_sales: None,
        other_sales: None,
        global_sales: Some(1.0),
    }
}

fn year_text() -> impl Strategy<Value = String> {
    prop_oneof![
        (1970i32..2030).prop_map(|y| y.to_string()),
        (1970i32..2030).prop_map(|y| format!("{y}.0")),
        Just("N/A".to_string()),
        Just(String::new()),
        (-50i32..=0).prop_map(|y| y.to_string()),
        "[a-z]{1,4}",
    ]
}

proptest! {
    #[test]
    fn normalized_years_are_positive_and_bounded(years in prop::collection::vec(year_text(), 0..40)) {
        let total = years.len();
        let normalized = normalize(years.into_iter().map(raw_with_year).collect());

        prop_assert!(normalized.table.iter().all(|r| r.year > 0));
        prop_assert_eq!(normalized.table.len() + normalized.dropped, total);

        match normalized.year_range {
            Some(range) => {
                prop_assert!(range.min <= range.max);
                prop_assert!(normalized.table.iter().all(|r| range.contains(r.year)));
            }
            None => prop_assert!(normalized.table.is_empty()),
        }
    }

    #[test]
    fn integral_years_parse_in_both_spellings(year in 1i32..3000) {
        prop_assert_eq!(parse_year(&year.to_string()), year);
        prop_assert_eq!(parse_year(&format!("{year}.0")), year);
        prop_assert_eq!(parse_year(&format!("{year}.5")), UNKNOWN_YEAR);
    }
}
