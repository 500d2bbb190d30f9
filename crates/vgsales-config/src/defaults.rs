//! Default values for every configuration section.

use crate::schema::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use vgsales_common::{LoggingConfig, SortOrder};

/// Default dataset file name.
pub const DEFAULT_DATASET_PATH: &str = "vgsales.csv";

/// Default number of rows in ranked charts.
pub const DEFAULT_TOP_N: usize = 10;

/// Default long-tail threshold of the platform pie chart, in percent.
pub const DEFAULT_OTHERS_THRESHOLD_PERCENT: f64 = 1.0;

/// Default language code.
pub const DEFAULT_LANGUAGE: &str = "en-US";

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            dashboard: DashboardConfig::default(),
            output: OutputConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATASET_PATH),
            delimiter: ',',
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            year_range: None,
            top_n: DEFAULT_TOP_N,
            sort_order: SortOrder::Descending,
            others_threshold_percent: DEFAULT_OTHERS_THRESHOLD_PERCENT,
            tabs: BTreeMap::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("dashboard"),
            format: OutputFormat::Png,
            width: 800,
            height: 600,
            background: "#ffffff".to_string(),
            // Plotly qualitative palette.
            palette: [
                "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692",
                "#b6e880", "#ff97ff", "#fecb52",
            ]
            .iter()
            .map(|c| (*c).to_string())
            .collect(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_capacity: 256,
        }
    }
}
