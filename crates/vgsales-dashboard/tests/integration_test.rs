//! Integration tests for vgsales-dashboard
//!
//! These run the whole pipeline against a small CSV file: configuration
//! loading, normalization, control handling and JSON export.

use proptest::prelude::*;
use std::fs;
use std::path::Path;
use vgsales_common::test_utils::{init_test_logging, sales_fixtures};
use vgsales_common::{PlatformFilter, Region, SalesError, YearRange};
use vgsales_config::{Config, ConfigLoader, OutputFormat};
use vgsales_dashboard::{build_dashboard, run, Control, DashboardError, MANIFEST_FILE};
use vgsales_graphs::ChartSpec;

fn json_config(dir: &Path) -> Config {
    let dataset = dir.join("vgsales.csv");
    fs::write(&dataset, sales_fixtures::sample_csv()).unwrap();

    let mut config = Config::default();
    config.dataset.path = dataset;
    config.output.directory = dir.join("dashboard");
    config.output.format = OutputFormat::Json;
    config
}

fn read_chart(dir: &Path, relative: &str) -> ChartSpec {
    let text = fs::read_to_string(dir.join(relative)).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_run_exports_json_dashboard() {
    init_test_logging();
    let temp_dir = tempfile::tempdir().unwrap();
    let config = json_config(temp_dir.path());

    let manifest = run(&config).unwrap();

    assert_eq!(manifest.tabs.len(), 5);
    assert_eq!(manifest.years, Some(YearRange { min: 1985, max: 2008 }));
    assert!(manifest.warning.unwrap().contains('1'));
    assert!(config.output.directory.join(MANIFEST_FILE).is_file());

    let totals = read_chart(&config.output.directory, "japan/platform_totals.json");
    assert_eq!(totals.points[0].label, "Wii");
    assert_eq!(totals.points.len(), 4);
    assert!(totals.points.iter().all(|point| point.label != "PS2"));

    let games = read_chart(&config.output.directory, "north_america/top_games.json");
    assert_eq!(games.points[0].label, "Wii Sports");
    assert!(games.points.iter().any(|point| point.label == "Tetris, Deluxe"));
}

#[test]
fn test_yaml_config_drives_initial_selections() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dataset = temp_dir.path().join("vgsales.csv");
    fs::write(&dataset, sales_fixtures::sample_csv()).unwrap();

    let config_path = temp_dir.path().join("dashboard.yaml");
    fs::write(
        &config_path,
        format!(
            concat!(
                "dataset:\n  path: {}\n",
                "dashboard:\n",
                "  year_range: {{ min: 1980, max: 1990 }}\n",
                "  top_n: 3\n",
                "  tabs:\n",
                "    japan:\n      games_platform: GB\n      genres_platform: Wii\n",
            ),
            dataset.display()
        ),
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_path).unwrap();
    let dashboard = build_dashboard(&config).unwrap();

    assert_eq!(dashboard.state().years, Some(YearRange { min: 1985, max: 1990 }));
    let japan = dashboard.state().tab(Region::Japan);
    assert_eq!(japan.games_platform, PlatformFilter::from("GB"));
    // No Wii release before 1991.
    assert!(japan.genres_platform.is_all());

    let tab = dashboard.render_tab(Region::Japan).unwrap();
    assert_eq!(tab.top_games.points.len(), 1);
    assert_eq!(tab.top_games.points[0].label, "Tetris, Deluxe");
}

#[test]
fn test_controls_update_only_affected_tabs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut dashboard = build_dashboard(&json_config(temp_dir.path())).unwrap();

    let before = dashboard.render_tab(Region::NorthAmerica).unwrap();
    let affected = dashboard
        .apply(Control::SelectGamesPlatform(Region::Europe, PlatformFilter::from("NES")))
        .unwrap();
    assert_eq!(affected, vec![Region::Europe]);
    assert_eq!(dashboard.render_tab(Region::NorthAmerica).unwrap(), before);

    let europe = dashboard.render_tab(Region::Europe).unwrap();
    assert_eq!(europe.top_games.points.len(), 1);
    assert_eq!(europe.top_games.points[0].label, "Super Mario Bros.");
}

#[test]
fn test_missing_dataset_reports_data_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.dataset.path = temp_dir.path().join("absent.csv");

    let err = build_dashboard(&config).unwrap_err();
    assert!(matches!(err, DashboardError::Sales(SalesError::Data { .. })));
}

#[test]
fn test_dataset_without_valid_years_renders_empty_charts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = json_config(temp_dir.path());
    let dataset = temp_dir.path().join("unknown_years.csv");
    fs::write(
        &dataset,
        concat!(
            "Name,Platform,Year,Genre,Publisher,NA_Sales,EU_Sales,JP_Sales,Other_Sales,Global_Sales\n",
            "Madden NFL 2004,PS2,N/A,Sports,Electronic Arts,4.26,0.26,0.01,0.71,5.23\n",
        ),
    )
    .unwrap();
    config.dataset.path = dataset;

    let dashboard = build_dashboard(&config).unwrap();
    assert_eq!(dashboard.year_bounds(), None);
    assert_eq!(dashboard.dropped_rows(), 1);

    let manifest = run(&config).unwrap();
    assert_eq!(manifest.years, None);
    assert!(manifest.warning.is_some());

    for tab in &manifest.tabs {
        for chart in &tab.charts {
            let spec = read_chart(&config.output.directory, &chart.to_string_lossy());
            assert!(spec.is_empty(), "{}", chart.display());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_selections_always_offered(
        ranges in prop::collection::vec((1970i32..2020, 1970i32..2020), 1..6),
        platform in prop::sample::select(vec!["Wii", "NES", "GB", "DS", "PS2"]),
    ) {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut dashboard = build_dashboard(&json_config(temp_dir.path())).unwrap();

        for (a, b) in ranges {
            let _ = dashboard.apply(Control::SelectGenresPlatform(
                Region::Global,
                PlatformFilter::from(platform),
            ));
            dashboard.apply(Control::SetYearRange(YearRange::new(a, b))).unwrap();

            let years = dashboard.state().years.unwrap();
            prop_assert!(years.min >= 1985 && years.max <= 2008);

            let selection = dashboard.state().tab(Region::Global).genres_platform;
            if let PlatformFilter::Only(ref name) = selection {
                prop_assert!(dashboard.platforms().contains(name));
            }
        }
    }
}
